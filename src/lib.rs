//! Rourn Duo Catch - two players, one arena, a lot of falling food
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, effects)
//! - `tuning`: Data-driven game balance and match configuration
//! - `autopilot`: Demo controller that plays a side on its own

pub mod autopilot;
pub mod sim;
pub mod tuning;

pub use tuning::{ItemDef, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical arena dimensions (16:9 virtual space)
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;

    /// Largest frame step accepted by the simulation (seconds)
    pub const MAX_DT: f32 = 0.05;

    /// Tolerance when comparing catalog weights against 1.0
    pub const WEIGHT_EPSILON: f32 = 1e-3;
}

/// Clamp a frame step into `[0, MAX_DT]`, treating NaN/inf as a dropped frame
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, consts::MAX_DT)
    } else {
        0.0
    }
}

/// Clamp a top-left position so a box of `size` stays inside `arena`
#[inline]
pub fn clamp_to_arena(pos: Vec2, size: Vec2, arena: Vec2) -> Vec2 {
    let max = (arena - size).max(Vec2::ZERO);
    pos.clamp(Vec2::ZERO, max)
}

/// Cubic ease-out on `t` in `[0, 1]`
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}
