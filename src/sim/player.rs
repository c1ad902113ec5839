//! Player entity: position, forms, timed effects and movement modes

use std::collections::{BTreeMap, VecDeque};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, perimeter_length, position_from_perimeter_t, project_perimeter_t};
use super::item::{ItemKind, ShotKind};
use crate::tuning::Tuning;
use crate::{clamp_to_arena, ease_out_cubic};

/// Which side a player plays on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }
}

/// Persistent player transformation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerForm {
    #[default]
    Base,
    /// Rolls along the arena border
    Pizza,
    /// Fires sideways
    Burger,
    /// Hops and fires upward
    Tacos,
    /// Faster on foot
    Brocolis,
    /// Bonus-streak form; grows with every food catch
    Ultimate,
}

impl PlayerForm {
    /// Form unlocked by catching enough of one food
    pub fn from_food(kind: ItemKind) -> Option<Self> {
        match kind {
            ItemKind::Pizza => Some(PlayerForm::Pizza),
            ItemKind::Burger => Some(PlayerForm::Burger),
            ItemKind::Tacos => Some(PlayerForm::Tacos),
            ItemKind::Brocolis => Some(PlayerForm::Brocolis),
            ItemKind::Chicken | ItemKind::Bomb => None,
        }
    }

    pub fn speed_multiplier(self) -> f32 {
        match self {
            PlayerForm::Brocolis => 1.25,
            _ => 1.0,
        }
    }

    /// Constant size factor folded into the aggregate scale
    pub fn scale_factor(self) -> f32 {
        match self {
            PlayerForm::Burger => 1.0,
            _ => 1.0,
        }
    }

    #[inline]
    pub fn can_fire(self) -> bool {
        matches!(self, PlayerForm::Tacos | PlayerForm::Burger)
    }

    #[inline]
    pub fn rolls(self) -> bool {
        self == PlayerForm::Pizza
    }

    #[inline]
    pub fn hops(self) -> bool {
        self == PlayerForm::Tacos
    }

    #[inline]
    pub fn is_transformed(self) -> bool {
        self != PlayerForm::Base
    }
}

/// Seconds remaining on each timed effect; zero means inactive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectTimers {
    /// Free 2D movement + bonus size (chicken)
    pub free_move: f32,
    /// Shrink penalty (bomb)
    pub shrink: f32,
    pub speed_boost: f32,
}

impl EffectTimers {
    /// Decrement every counter, flooring at zero
    pub fn tick(&mut self, dt: f32) {
        self.free_move = (self.free_move - dt).max(0.0);
        self.shrink = (self.shrink - dt).max(0.0);
        self.speed_boost = (self.speed_boost - dt).max(0.0);
    }

    #[inline]
    pub fn free_moving(&self) -> bool {
        self.free_move > 0.0
    }
}

/// Eased glide toward a target position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CenterMove {
    pub from: Vec2,
    pub to: Vec2,
    pub elapsed: f32,
    pub duration: f32,
}

impl CenterMove {
    /// Advance and return the new position
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let t = ease_out_cubic(self.elapsed / self.duration);
        self.from.lerp(self.to, t)
    }

    #[inline]
    pub fn done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// One of the two players
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub slot: PlayerSlot,
    /// Top-left corner
    pub pos: Vec2,
    pub speed: f32,
    pub form: PlayerForm,
    /// Persistent scale (grows in the ultimate form)
    pub base_scale: f32,
    /// Aggregate scale for this frame
    pub scale: f32,
    pub base_width: f32,
    /// Sprite height / width
    pub aspect: f32,
    /// Resting y on the floor for the current height
    pub baseline_y: f32,
    pub effects: EffectTimers,
    /// Consecutive bonus catches
    pub bonus_streak: u32,
    pub captures: BTreeMap<ItemKind, u32>,
    /// Most-recent-first pickup history
    pub history: VecDeque<ItemKind>,
    pub score: i32,
    /// Sprite rotation (radians)
    pub angle: f32,
    pub hop_phase: f32,
    /// Position along the perimeter track (pizza form)
    pub perimeter_t: Option<f32>,
    pub fire_cooldown: f32,
    pub next_shot: ShotKind,
    pub center_move: Option<CenterMove>,
}

impl Player {
    /// Fresh player standing on the baseline at its side's starting spot
    pub fn new(slot: PlayerSlot, tuning: &Tuning) -> Self {
        let start_x = match slot {
            PlayerSlot::One => 0.25,
            PlayerSlot::Two => 0.75,
        };
        let mut player = Self {
            slot,
            pos: Vec2::new((tuning.arena_width * start_x).round(), 0.0),
            speed: tuning.player_speed,
            form: PlayerForm::Base,
            base_scale: 1.0,
            scale: 1.0,
            base_width: tuning.player_base_width,
            aspect: tuning.player_aspect,
            baseline_y: 0.0,
            effects: EffectTimers::default(),
            bonus_streak: 0,
            captures: ItemKind::ALL.iter().map(|&k| (k, 0)).collect(),
            history: VecDeque::with_capacity(tuning.history_len),
            score: 0,
            angle: 0.0,
            hop_phase: 0.0,
            perimeter_t: None,
            fire_cooldown: 0.0,
            next_shot: ShotKind::Salad,
            center_move: None,
        };
        player.refresh_baseline(tuning);
        player.pos.y = player.baseline_y;
        player.confine(tuning.arena());
        player
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.base_width * self.scale
    }

    #[inline]
    pub fn height(&self) -> f32 {
        (self.base_width * self.aspect * self.scale).max(1.0)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size())
    }

    pub fn captures_of(&self, kind: ItemKind) -> u32 {
        self.captures.get(&kind).copied().unwrap_or(0)
    }

    /// Effective movement speed (form and speed boost applied)
    pub fn move_speed(&self, tuning: &Tuning) -> f32 {
        let boost = if self.effects.speed_boost > 0.0 {
            tuning.speed_boost_mult
        } else {
            1.0
        };
        self.speed * self.form.speed_multiplier() * boost
    }

    /// Integrate one frame of movement
    ///
    /// `dir` must already be normalized. While a center glide is running it
    /// owns the position and input is ignored.
    pub fn update(&mut self, dir: Vec2, dt: f32, tuning: &Tuning) {
        let sp = self.move_speed(tuning);

        if let Some(glide) = self.center_move.as_mut() {
            self.pos = glide.advance(dt);
            if glide.done() {
                self.center_move = None;
            }
        } else {
            self.pos += dir * sp * dt;
        }

        if self.form.rolls() && self.effects.free_moving() {
            let dominant = if dir.x.abs() >= dir.y.abs() { dir.x } else { dir.y };
            self.angle += dominant * sp * dt * tuning.rotation_factor;
        }

        let hop_rate = if self.form.hops() {
            (dir.x.abs() * 1.2).clamp(0.4, 1.5)
        } else {
            0.5
        };
        self.hop_phase += dt * tuning.hop_frequency * hop_rate;

        self.confine(tuning.arena());
    }

    /// Clamp inside the arena
    pub fn confine(&mut self, arena: Vec2) {
        self.pos = clamp_to_arena(self.pos, self.size(), arena);
    }

    /// Multiplicative scale: persistent × form × bonus × shrink
    pub fn recompute_scale(&mut self, tuning: &Tuning) {
        let bonus = if self.effects.free_moving() && self.form != PlayerForm::Ultimate {
            tuning.bonus_scale
        } else {
            1.0
        };
        let shrink = if self.effects.shrink > 0.0 {
            tuning.shrink_scale
        } else {
            1.0
        };
        self.scale = self.base_scale * self.form.scale_factor() * bonus * shrink;
    }

    /// Resting y for the current height
    pub fn refresh_baseline(&mut self, tuning: &Tuning) {
        self.baseline_y = (tuning.arena_height - self.height() - tuning.baseline_margin).max(0.0);
    }

    /// Ease down toward the baseline without overshooting
    pub fn settle(&mut self, dt: f32, tuning: &Tuning) {
        if self.pos.y < self.baseline_y {
            self.pos.y = (self.pos.y + tuning.fall_speed * dt).min(self.baseline_y);
        } else {
            self.pos.y = self.baseline_y;
        }
    }

    /// Travel the perimeter track by `sign` × speed × dt
    pub fn roll(&mut self, sign: f32, dt: f32, tuning: &Tuning) {
        let arena = tuning.arena();
        let size = self.size();
        let len = perimeter_length(size, arena);
        if len <= 0.0 {
            return;
        }
        let t = self
            .perimeter_t
            .unwrap_or_else(|| project_perimeter_t(self.pos, size, arena));
        let dist = sign * self.move_speed(tuning) * dt;
        let t = (t + dist).rem_euclid(len);
        self.perimeter_t = Some(t);
        self.pos = position_from_perimeter_t(t, size, arena);
        self.angle += dist * tuning.rotation_factor;
    }

    /// Rectified-sine hop on top of the baseline
    pub fn apply_hop(&mut self, tuning: &Tuning) {
        let hop = self.hop_phase.sin().max(0.0) * tuning.hop_amplitude;
        self.pos.y = (self.baseline_y - hop).max(0.0);
    }

    /// Push a pickup onto the front of the bounded history
    pub fn record_history(&mut self, kind: ItemKind, max_len: usize) {
        self.history.push_front(kind);
        self.history.truncate(max_len);
    }

    /// Start an eased glide to the arena center
    pub fn glide_to_center(&mut self, tuning: &Tuning) {
        let target = ((tuning.arena() - self.size()) * 0.5).max(Vec2::ZERO);
        self.center_move = Some(CenterMove {
            from: self.pos,
            to: target,
            elapsed: 0.0,
            duration: tuning.center_move_secs,
        });
    }
}
