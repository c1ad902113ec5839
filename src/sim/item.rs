//! Falling items and player-fired projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::player::PlayerSlot;
use crate::tuning::{ItemDef, Tuning};

/// Item catalog keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Pizza,
    Burger,
    Tacos,
    Brocolis,
    /// Bonus: free movement, progresses toward the ultimate form
    Chicken,
    /// Hazard: shrink penalty, cancels the bonus
    Bomb,
}

impl ItemKind {
    pub const ALL: [ItemKind; 6] = [
        ItemKind::Pizza,
        ItemKind::Burger,
        ItemKind::Tacos,
        ItemKind::Brocolis,
        ItemKind::Chicken,
        ItemKind::Bomb,
    ];

    /// Plain food (neither bonus nor hazard)
    #[inline]
    pub fn is_food(self) -> bool {
        !matches!(self, ItemKind::Chicken | ItemKind::Bomb)
    }
}

/// A catchable item in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub points: i32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Velocity at difficulty 1.0, jitter included
    pub vel: Vec2,
    /// Fixed per-instance speed multiplier
    pub variation: f32,
}

impl Item {
    /// Build an item from its catalog row
    ///
    /// `dir` is the unit travel direction. Points, speed and size come from
    /// the catalog only; a missing row yields a zero-point item rather than
    /// a panic mid-frame.
    pub fn new(id: u32, kind: ItemKind, tuning: &Tuning, pos: Vec2, dir: Vec2, variation: f32) -> Self {
        debug_assert!(tuning.item(kind).is_some(), "no catalog entry for {kind:?}");
        let fallback;
        let def = match tuning.item(kind) {
            Some(def) => def,
            None => {
                log::error!("No catalog entry for {:?}, spawning inert item", kind);
                fallback = ItemDef::new(kind, 0, 100.0, 56.0, 0.0);
                &fallback
            }
        };

        Self {
            id,
            kind,
            points: def.points,
            pos,
            size: def.size(),
            vel: dir * def.base_speed * variation,
            variation,
        }
    }

    /// Advance by velocity scaled by the difficulty multiplier
    pub fn update(&mut self, dt: f32, speed_mult: f32) {
        self.pos += self.vel * speed_mult * dt;
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Projectile sprite/variant, fired in a fixed rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShotKind {
    #[default]
    Salad,
    Tomato,
}

impl ShotKind {
    /// Next kind in the rotation
    pub fn next(self) -> Self {
        match self {
            ShotKind::Salad => ShotKind::Tomato,
            ShotKind::Tomato => ShotKind::Salad,
        }
    }
}

/// A shot fired by a transformed player; catches items on the owner's behalf
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: PlayerSlot,
    pub kind: ShotKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Seconds left before the shot fizzles
    pub ttl: f32,
}

impl Projectile {
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.ttl -= dt;
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.ttl <= 0.0
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_values_come_from_catalog() {
        let tuning = Tuning::default();
        let item = Item::new(1, ItemKind::Bomb, &tuning, Vec2::ZERO, Vec2::Y, 1.0);
        assert_eq!(item.points, -5);
        assert_eq!(item.size, Vec2::new(56.0, 56.0));
        assert_eq!(item.vel, Vec2::new(0.0, 220.0));
    }

    #[test]
    fn test_item_update_applies_multiplier() {
        let tuning = Tuning::default();
        let mut item = Item::new(1, ItemKind::Pizza, &tuning, Vec2::ZERO, Vec2::Y, 1.1);
        item.update(0.5, 2.0);
        // 140 * 1.1 * 2.0 * 0.5
        assert!((item.pos.y - 154.0).abs() < 1e-3);
        assert_eq!(item.pos.x, 0.0);
    }

    #[test]
    fn test_shot_rotation() {
        assert_eq!(ShotKind::Salad.next(), ShotKind::Tomato);
        assert_eq!(ShotKind::Tomato.next().next(), ShotKind::Tomato);
    }

    #[test]
    fn test_projectile_lifetime() {
        let mut shot = Projectile {
            id: 1,
            owner: PlayerSlot::One,
            kind: ShotKind::Salad,
            pos: Vec2::ZERO,
            size: Vec2::splat(10.0),
            vel: Vec2::new(0.0, -180.0),
            ttl: 0.05,
        };
        shot.update(0.03);
        assert!(!shot.expired());
        shot.update(0.03);
        assert!(shot.expired());
        assert!((shot.pos.y + 10.8).abs() < 1e-3);
    }
}
