//! Match configuration and game balance
//!
//! Every constant the simulation reads lives here so a match can be tuned
//! from JSON without touching code. `Tuning::default()` is the stock balance.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, WEIGHT_EPSILON};
use crate::sim::item::ItemKind;

/// Configuration rejected at startup
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog has no entry for {0:?}")]
    MissingItem(ItemKind),
    #[error("catalog lists {0:?} more than once")]
    DuplicateItem(ItemKind),
    #[error("catalog weights sum to {0}, expected 1.0")]
    WeightSum(f32),
    #[error("catalog entry {kind:?} has an invalid {field}")]
    InvalidItem { kind: ItemKind, field: &'static str },
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("{0} is out of range")]
    OutOfRange(&'static str),
    #[error("player sprite ({0}x{1}) does not fit the arena")]
    PlayerTooLarge(f32, f32),
}

/// How new items enter the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnMode {
    /// Drop straight down from just above the top edge
    #[default]
    Falling,
    /// Enter from a random edge, aimed into the arena
    Edges,
}

/// One catalog row: everything about an item type that never changes per instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub kind: ItemKind,
    /// Score delta on pickup (negative for hazards)
    pub points: i32,
    /// Fall speed before jitter and difficulty (px/s)
    pub base_speed: f32,
    /// Display width (px); height comes from `aspect`
    pub base_width: f32,
    /// Probability weight in the spawn draw
    pub weight: f32,
    /// Sprite height / width
    #[serde(default = "default_aspect")]
    pub aspect: f32,
    /// Seconds of speed boost granted on pickup (0 = none)
    #[serde(default)]
    pub speed_boost_secs: f32,
}

fn default_aspect() -> f32 {
    1.0
}

impl ItemDef {
    pub fn new(kind: ItemKind, points: i32, base_speed: f32, base_width: f32, weight: f32) -> Self {
        Self {
            kind,
            points,
            base_speed,
            base_width,
            weight,
            aspect: 1.0,
            speed_boost_secs: 0.0,
        }
    }

    /// Display size (aspect-corrected)
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.base_width, (self.base_width * self.aspect).max(1.0))
    }
}

/// A guaranteed spawn of one item type every `period` seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForcedSpawn {
    pub kind: ItemKind,
    pub period: f32,
}

/// Complete match configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena / match ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Match length (seconds)
    pub match_duration: f32,
    /// First player to reach this score ends the match early
    pub win_score: Option<i32>,

    // === Players ===
    pub player_speed: f32,
    pub player_base_width: f32,
    /// Player sprite height / width
    pub player_aspect: f32,
    /// Gap between the resting baseline and the arena floor
    pub baseline_margin: f32,
    /// Speed at which a grounded player eases back to the baseline (px/s)
    pub fall_speed: f32,
    pub speed_boost_mult: f32,

    // === Bonus (chicken) ===
    pub free_move_secs: f32,
    pub bonus_scale: f32,
    /// Duration of the eased glide to arena center
    pub center_move_secs: f32,
    /// Consecutive bonus catches that trigger the ultimate form
    pub ultimate_streak: u32,
    pub ultimate_growth_step: f32,
    pub ultimate_max_scale: f32,

    // === Hazard (bomb) ===
    pub shrink_secs: f32,
    pub shrink_scale: f32,

    // === Forms ===
    /// Captures of one food type that transform a base player
    pub transform_threshold: u32,
    pub hop_amplitude: f32,
    pub hop_frequency: f32,
    /// Radians of spin per pixel travelled (pizza form)
    pub rotation_factor: f32,

    // === Shots ===
    pub auto_fire: bool,
    pub shot_interval: f32,
    pub shot_speed: f32,
    pub shot_lifetime: f32,
    pub max_shots: usize,

    // === Spawning / difficulty ===
    pub spawn_mode: SpawnMode,
    pub spawn_base_rate: f32,
    pub difficulty_interval: f32,
    pub spawn_rate_step: f32,
    pub fall_speed_step: f32,
    pub max_spawn_rate: f32,
    pub max_fall_speed_mult: f32,
    pub max_items: usize,
    /// Per-instance speed jitter half-width (0.1 = 0.9..1.1)
    pub speed_jitter: f32,
    /// Max deviation from the inward normal for edge entries (radians)
    pub edge_spread: f32,
    /// Distance past an arena edge before an entity is pruned
    pub offscreen_margin: f32,
    pub forced_spawns: Vec<ForcedSpawn>,

    // === Collision / display ===
    pub collision_pad: f32,
    /// Recent-pickup history length per player
    pub history_len: usize,

    pub catalog: Vec<ItemDef>,
}

impl Default for Tuning {
    fn default() -> Self {
        let mut brocolis = ItemDef::new(ItemKind::Brocolis, 1, 110.0, 50.0, 0.2075);
        brocolis.speed_boost_secs = 2.0;

        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            match_duration: 130.0,
            win_score: None,

            player_speed: 300.0,
            player_base_width: 80.0,
            player_aspect: 1.0,
            baseline_margin: 12.0,
            fall_speed: 900.0,
            speed_boost_mult: 1.3,

            free_move_secs: 5.0,
            bonus_scale: 1.25,
            center_move_secs: 0.35,
            ultimate_streak: 3,
            ultimate_growth_step: 0.05,
            ultimate_max_scale: 2.5,

            shrink_secs: 5.0,
            shrink_scale: 0.5,

            transform_threshold: 10,
            hop_amplitude: 22.0,
            hop_frequency: 8.0,
            rotation_factor: 0.12,

            auto_fire: false,
            shot_interval: 3.0,
            shot_speed: 180.0,
            shot_lifetime: 6.0,
            max_shots: 24,

            spawn_mode: SpawnMode::Falling,
            spawn_base_rate: 1.2,
            difficulty_interval: 20.0,
            spawn_rate_step: 0.15,
            fall_speed_step: 0.05,
            max_spawn_rate: 3.5,
            max_fall_speed_mult: 2.0,
            max_items: 60,
            speed_jitter: 0.1,
            edge_spread: std::f32::consts::FRAC_PI_3,
            offscreen_margin: 10.0,
            forced_spawns: vec![ForcedSpawn {
                kind: ItemKind::Chicken,
                period: 25.0,
            }],

            collision_pad: 4.0,
            history_len: 3,

            catalog: vec![
                ItemDef::new(ItemKind::Pizza, 3, 140.0, 56.0, 0.2075),
                ItemDef::new(ItemKind::Burger, 3, 140.0, 56.0, 0.2075),
                ItemDef::new(ItemKind::Tacos, 2, 130.0, 56.0, 0.2075),
                brocolis,
                ItemDef::new(ItemKind::Chicken, 5, 200.0, 60.0, 0.05),
                ItemDef::new(ItemKind::Bomb, -5, 220.0, 56.0, 0.12),
            ],
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning file; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    #[inline]
    pub fn arena(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Catalog row for `kind`
    pub fn item(&self, kind: ItemKind) -> Option<&ItemDef> {
        self.catalog.iter().find(|d| d.kind == kind)
    }

    /// Reject configurations the simulation cannot run safely
    pub fn validate(&self) -> Result<(), TuningError> {
        let positives = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("match_duration", self.match_duration),
            ("player_speed", self.player_speed),
            ("player_base_width", self.player_base_width),
            ("player_aspect", self.player_aspect),
            ("free_move_secs", self.free_move_secs),
            ("center_move_secs", self.center_move_secs),
            ("shrink_secs", self.shrink_secs),
            ("shrink_scale", self.shrink_scale),
            ("bonus_scale", self.bonus_scale),
            ("ultimate_max_scale", self.ultimate_max_scale),
            ("shot_interval", self.shot_interval),
            ("shot_speed", self.shot_speed),
            ("shot_lifetime", self.shot_lifetime),
            ("difficulty_interval", self.difficulty_interval),
            ("spawn_base_rate", self.spawn_base_rate),
            ("max_spawn_rate", self.max_spawn_rate),
            ("max_fall_speed_mult", self.max_fall_speed_mult),
        ];
        for (name, value) in positives {
            if !(value > 0.0 && value.is_finite()) {
                return Err(TuningError::NonPositive(name));
            }
        }
        // Ramp steps may be zero (flat difficulty) but never shrink it
        let non_negatives = [
            ("fall_speed", self.fall_speed),
            ("collision_pad", self.collision_pad),
            ("offscreen_margin", self.offscreen_margin),
            ("spawn_rate_step", self.spawn_rate_step),
            ("fall_speed_step", self.fall_speed_step),
        ];
        for (name, value) in non_negatives {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(TuningError::Negative(name));
            }
        }
        // At 1.0 or above an item can spawn standing still or moving backwards
        if !(self.speed_jitter >= 0.0 && self.speed_jitter < 1.0) {
            return Err(TuningError::OutOfRange("speed_jitter"));
        }
        if self.max_items == 0 {
            return Err(TuningError::NonPositive("max_items"));
        }
        if self.transform_threshold == 0 {
            return Err(TuningError::NonPositive("transform_threshold"));
        }
        if self.ultimate_streak == 0 {
            return Err(TuningError::NonPositive("ultimate_streak"));
        }

        // Largest the player can get: ultimate cap with the bonus factor on top
        let max_scale = self.ultimate_max_scale.max(1.0) * self.bonus_scale.max(1.0);
        let w = self.player_base_width * max_scale;
        let h = self.player_base_width * self.player_aspect * max_scale;
        if w > self.arena_width || h + self.baseline_margin > self.arena_height {
            return Err(TuningError::PlayerTooLarge(w, h));
        }

        for kind in ItemKind::ALL {
            match self.catalog.iter().filter(|d| d.kind == kind).count() {
                0 => return Err(TuningError::MissingItem(kind)),
                1 => {}
                _ => return Err(TuningError::DuplicateItem(kind)),
            }
        }

        let mut sum = 0.0;
        for def in &self.catalog {
            let invalid = |field| TuningError::InvalidItem {
                kind: def.kind,
                field,
            };
            if !(def.weight >= 0.0) {
                return Err(invalid("weight"));
            }
            if !(def.base_width > 0.0) || def.base_width > self.arena_width {
                return Err(invalid("base_width"));
            }
            if !(def.base_speed > 0.0) {
                return Err(invalid("base_speed"));
            }
            if !(def.aspect > 0.0) {
                return Err(invalid("aspect"));
            }
            if def.speed_boost_secs < 0.0 {
                return Err(invalid("speed_boost_secs"));
            }
            sum += def.weight;
        }
        if (sum - 1.0).abs() > WEIGHT_EPSILON {
            return Err(TuningError::WeightSum(sum));
        }

        for forced in &self.forced_spawns {
            if !(forced.period > 0.0) {
                return Err(TuningError::NonPositive("forced_spawns.period"));
            }
        }

        Ok(())
    }
}
