//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped variable timestep, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (spawn order for items, fire order for shots)
//! - No rendering, audio or platform dependencies

pub mod difficulty;
pub mod geometry;
pub mod input;
pub mod item;
pub mod pickup;
pub mod player;
pub mod spawn;
pub mod state;
pub mod tick;

pub use difficulty::Difficulty;
pub use geometry::{Rect, intersects, perimeter_length, position_from_perimeter_t, project_perimeter_t};
pub use input::{ControlScheme, Key, Keyboard, PlayerIntent, TriggerLatch};
pub use item::{Item, ItemKind, Projectile, ShotKind};
pub use pickup::apply_pickup;
pub use player::{CenterMove, EffectTimers, Player, PlayerForm, PlayerSlot};
pub use spawn::{Spawner, pick_kind, place, spawn_step};
pub use state::{EndReason, GameEvent, MatchPhase, MatchState, MatchSummary, PlayerSummary};
pub use tick::{TickInput, tick};
