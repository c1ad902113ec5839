//! Axis-aligned rectangles and the arena-perimeter track
//!
//! Everything in the arena collides as a box. The perimeter track maps a
//! single scalar `t` onto the border of the arena (shrunk by the entity's own
//! size), walking bottom → right → top → left.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box, top-left origin, y pointing down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Box expanded by `by` on every side
    pub fn grown(&self, by: f32) -> Rect {
        Rect::new(self.pos - Vec2::splat(by), self.size + Vec2::splat(2.0 * by))
    }

    /// True if the box lies entirely inside `[0, arena]` (sub-pixel slack)
    pub fn within(&self, arena: Vec2) -> bool {
        const SLACK: f32 = 1e-3;
        let max = self.max();
        self.pos.x >= 0.0 && self.pos.y >= 0.0 && max.x <= arena.x + SLACK && max.y <= arena.y + SLACK
    }

    /// True once the box is more than `margin` past any arena edge
    pub fn outside(&self, arena: Vec2, margin: f32) -> bool {
        let max = self.max();
        max.x < -margin || max.y < -margin || self.pos.x > arena.x + margin || self.pos.y > arena.y + margin
    }
}

/// Padded overlap test
///
/// Both boxes are shrunk by `pad` on every side before the strict overlap
/// check, so edge-grazing contacts don't count.
#[inline]
pub fn intersects(a: &Rect, b: &Rect, pad: f32) -> bool {
    let (a_min, a_max) = (a.min(), a.max());
    let (b_min, b_max) = (b.min(), b.max());
    a_min.x + pad < b_max.x - pad
        && a_max.x - pad > b_min.x + pad
        && a_min.y + pad < b_max.y - pad
        && a_max.y - pad > b_min.y + pad
}

/// Free travel span for a box of `size` (never negative)
#[inline]
fn spans(size: Vec2, arena: Vec2) -> (f32, f32) {
    ((arena.x - size.x).max(0.0), (arena.y - size.y).max(0.0))
}

/// Length of the perimeter track for a box of `size`
pub fn perimeter_length(size: Vec2, arena: Vec2) -> f32 {
    let (w, h) = spans(size, arena);
    2.0 * (w + h)
}

/// Map a position to the track scalar of its nearest edge
pub fn project_perimeter_t(pos: Vec2, size: Vec2, arena: Vec2) -> f32 {
    let (w, h) = spans(size, arena);
    let x = pos.x.clamp(0.0, w);
    let y = pos.y.clamp(0.0, h);

    let d_top = pos.y;
    let d_bottom = (h - pos.y).abs();
    let d_left = pos.x;
    let d_right = (w - pos.x).abs();
    let nearest = d_top.min(d_bottom).min(d_left).min(d_right);

    if nearest == d_bottom {
        x
    } else if nearest == d_right {
        w + (h - y)
    } else if nearest == d_top {
        w + h + (w - x)
    } else {
        w + h + w + y
    }
}

/// Map a track scalar back to a position; `t` wraps modulo the track length
pub fn position_from_perimeter_t(t: f32, size: Vec2, arena: Vec2) -> Vec2 {
    let (w, h) = spans(size, arena);
    let len = 2.0 * (w + h);
    if len <= 0.0 {
        return Vec2::ZERO;
    }
    let t = t.rem_euclid(len);

    if t <= w {
        Vec2::new(t, h)
    } else if t <= w + h {
        Vec2::new(w, h - (t - w))
    } else if t <= w + h + w {
        Vec2::new(w - (t - (w + h)), 0.0)
    } else {
        Vec2::new(0.0, t - (w + h + w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ARENA: Vec2 = Vec2::new(1280.0, 720.0);
    const SIZE: Vec2 = Vec2::new(80.0, 80.0);

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_intersects_overlap() {
        let a = rect(0.0, 0.0, 50.0, 50.0);
        let b = rect(30.0, 30.0, 50.0, 50.0);
        assert!(intersects(&a, &b, 4.0));
    }

    #[test]
    fn test_intersects_padding_rejects_grazing() {
        let a = rect(0.0, 0.0, 50.0, 50.0);
        // Overlaps by 6px horizontally; padding eats 8px
        let b = rect(44.0, 0.0, 50.0, 50.0);
        assert!(intersects(&a, &b, 0.0));
        assert!(!intersects(&a, &b, 4.0));
    }

    #[test]
    fn test_intersects_disjoint() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(100.0, 100.0, 10.0, 10.0);
        assert!(!intersects(&a, &b, 0.0));
    }

    #[test]
    fn test_perimeter_walk_order() {
        let (w, h) = (1200.0, 640.0);
        assert_eq!(position_from_perimeter_t(0.0, SIZE, ARENA), Vec2::new(0.0, h));
        assert_eq!(position_from_perimeter_t(w, SIZE, ARENA), Vec2::new(w, h));
        assert_eq!(position_from_perimeter_t(w + h, SIZE, ARENA), Vec2::new(w, 0.0));
        assert_eq!(position_from_perimeter_t(2.0 * w + h, SIZE, ARENA), Vec2::new(0.0, 0.0));
        assert_eq!(perimeter_length(SIZE, ARENA), 2.0 * (w + h));
    }

    #[test]
    fn test_perimeter_wraps_negative() {
        let len = perimeter_length(SIZE, ARENA);
        let a = position_from_perimeter_t(-10.0, SIZE, ARENA);
        let b = position_from_perimeter_t(len - 10.0, SIZE, ARENA);
        assert!((a - b).length() < 1e-3);
    }

    #[test]
    fn test_project_bottom_edge() {
        let t = project_perimeter_t(Vec2::new(300.0, 640.0), SIZE, ARENA);
        assert_eq!(t, 300.0);
    }

    #[test]
    fn test_rect_outside_margin() {
        let arena = Vec2::new(100.0, 100.0);
        assert!(!rect(0.0, 105.0, 10.0, 10.0).outside(arena, 10.0));
        assert!(rect(0.0, 111.0, 10.0, 10.0).outside(arena, 10.0));
        assert!(rect(-25.0, 50.0, 10.0, 10.0).outside(arena, 10.0));
        assert!(!rect(-10.0, -10.0, 10.0, 10.0).outside(arena, 10.0));
    }

    proptest! {
        #[test]
        fn prop_intersects_symmetric(
            ax in -100.0f32..1400.0, ay in -100.0f32..800.0, aw in 1.0f32..200.0, ah in 1.0f32..200.0,
            bx in -100.0f32..1400.0, by in -100.0f32..800.0, bw in 1.0f32..200.0, bh in 1.0f32..200.0,
            pad in 0.0f32..8.0,
        ) {
            let a = rect(ax, ay, aw, ah);
            let b = rect(bx, by, bw, bh);
            prop_assert_eq!(intersects(&a, &b, pad), intersects(&b, &a, pad));
        }

        #[test]
        fn prop_perimeter_round_trip_on_edge(t in 0.0f32..3679.0) {
            let pos = position_from_perimeter_t(t, SIZE, ARENA);
            let back = position_from_perimeter_t(project_perimeter_t(pos, SIZE, ARENA), SIZE, ARENA);
            prop_assert!((pos - back).length() < 0.01, "{pos:?} -> {back:?}");
        }

        #[test]
        fn prop_perimeter_stays_in_arena(t in -10_000.0f32..10_000.0) {
            let pos = position_from_perimeter_t(t, SIZE, ARENA);
            prop_assert!(Rect::new(pos, SIZE).within(ARENA));
        }
    }
}
