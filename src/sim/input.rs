//! Keyboard-to-intent mapping
//!
//! The simulation never sees keys, only `PlayerIntent`s and edge-triggered
//! phase triggers. This module owns the two fixed control schemes and the
//! latching that turns held keys into one-shot triggers.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::PlayerSlot;
use super::tick::TickInput;

/// One player's wishes for a single frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIntent {
    /// -1 (left), 0, +1 (right)
    pub move_x: i8,
    /// -1 (up), 0, +1 (down)
    pub move_y: i8,
    pub fire: bool,
}

impl PlayerIntent {
    pub const fn with_movement(move_x: i8, move_y: i8) -> Self {
        Self {
            move_x,
            move_y,
            fire: false,
        }
    }

    /// Raw direction with each axis clamped to {-1, 0, 1}; not normalized
    #[inline]
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.move_x.signum() as f32, self.move_y.signum() as f32)
    }
}

/// Logical keys the game reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Z,
    Q,
    S,
    D,
    F,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    P,
    R,
    Escape,
}

/// Fixed key binding for one player
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlScheme {
    pub up: Key,
    pub down: Key,
    pub left: Key,
    pub right: Key,
    pub fire: Key,
}

impl ControlScheme {
    /// Player 1: ZQSD + F
    pub const ZQSD: ControlScheme = ControlScheme {
        up: Key::Z,
        down: Key::S,
        left: Key::Q,
        right: Key::D,
        fire: Key::F,
    };

    /// Player 2: arrow keys + Enter
    pub const ARROWS: ControlScheme = ControlScheme {
        up: Key::Up,
        down: Key::Down,
        left: Key::Left,
        right: Key::Right,
        fire: Key::Enter,
    };

    pub fn for_slot(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::One => Self::ZQSD,
            PlayerSlot::Two => Self::ARROWS,
        }
    }

    /// Intent from the set of currently held keys; opposite keys cancel
    pub fn intent(&self, held: &HashSet<Key>) -> PlayerIntent {
        let axis = |neg: Key, pos: Key| held.contains(&pos) as i8 - held.contains(&neg) as i8;
        PlayerIntent {
            move_x: axis(self.left, self.right),
            move_y: axis(self.up, self.down),
            fire: held.contains(&self.fire),
        }
    }
}

/// Turns a level signal into a rising-edge trigger
#[derive(Clone, Copy, Debug, Default)]
pub struct TriggerLatch {
    was_down: bool,
}

impl TriggerLatch {
    /// True only on the frame the signal goes from up to down
    pub fn rising(&mut self, down: bool) -> bool {
        let fired = down && !self.was_down;
        self.was_down = down;
        fired
    }
}

/// Keyboard front-end: held keys in, one `TickInput` out per frame
#[derive(Clone, Debug, Default)]
pub struct Keyboard {
    start: TriggerLatch,
    pause: TriggerLatch,
    menu: TriggerLatch,
    replay: TriggerLatch,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Movement and fire are level-triggered; phase triggers fire once per press
    pub fn tick_input(&mut self, held: &HashSet<Key>) -> TickInput {
        TickInput {
            players: PlayerSlot::ALL.map(|slot| ControlScheme::for_slot(slot).intent(held)),
            start: self.start.rising(held.contains(&Key::Space)),
            pause: self.pause.rising(held.contains(&Key::P)),
            menu: self.menu.rising(held.contains(&Key::Escape)),
            replay: self.replay.rising(held.contains(&Key::R)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &[Key]) -> HashSet<Key> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_schemes_are_independent() {
        let held = keys(&[Key::D, Key::Z, Key::Left, Key::Enter]);
        let p1 = ControlScheme::ZQSD.intent(&held);
        let p2 = ControlScheme::ARROWS.intent(&held);
        assert_eq!((p1.move_x, p1.move_y, p1.fire), (1, -1, false));
        assert_eq!((p2.move_x, p2.move_y, p2.fire), (-1, 0, true));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let held = keys(&[Key::Q, Key::D]);
        let intent = ControlScheme::ZQSD.intent(&held);
        assert_eq!(intent.move_x, 0);
        assert_eq!(intent.direction(), Vec2::ZERO);
    }

    #[test]
    fn test_direction_clamps_axes() {
        let intent = PlayerIntent::with_movement(5, -3);
        assert_eq!(intent.direction(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_latch_fires_once_per_press() {
        let mut latch = TriggerLatch::default();
        assert!(latch.rising(true));
        assert!(!latch.rising(true));
        assert!(!latch.rising(false));
        assert!(latch.rising(true));
    }

    #[test]
    fn test_keyboard_pause_is_edge_triggered() {
        let mut kb = Keyboard::new();
        let held = keys(&[Key::P, Key::Right]);
        let first = kb.tick_input(&held);
        let second = kb.tick_input(&held);
        assert!(first.pause);
        assert!(!second.pause);
        assert_eq!(second.players[1].move_x, 1);
    }
}
