//! Match state and the events the simulation reports each frame
//!
//! Everything a match mutates lives in `MatchState`; presentation and audio
//! only ever read it.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::item::{Item, ItemKind, Projectile, ShotKind};
use super::player::{Player, PlayerForm, PlayerSlot};
use super::spawn::Spawner;
use crate::tuning::Tuning;

/// High-level match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Title screen, nothing simulated
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen mid-match
    Paused,
    /// Time ran out or a player reached the win score
    Over,
}

/// Why a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    TimeUp,
    ScoreReached(PlayerSlot),
}

/// Something noteworthy that happened during the last tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player touched an item
    ItemCaught {
        player: PlayerSlot,
        kind: ItemKind,
        points: i32,
    },
    /// A projectile hit an item on its owner's behalf
    ShotHit {
        player: PlayerSlot,
        kind: ItemKind,
        points: i32,
    },
    ShotFired {
        player: PlayerSlot,
        kind: ShotKind,
    },
    Transformed {
        player: PlayerSlot,
        form: PlayerForm,
    },
    DifficultyUp {
        spawn_rate: f32,
        fall_speed_mult: f32,
    },
    MatchOver(EndReason),
}

/// Complete match state (deterministic for a given seed and input stream)
#[derive(Debug, Clone, Serialize)]
pub struct MatchState {
    /// Seed for the first match; rematches derive from it
    pub seed: u64,
    /// Matches started so far with this state
    pub matches_played: u32,
    pub tuning: Tuning,
    pub phase: MatchPhase,
    /// Seconds since the match started
    pub elapsed: f32,
    /// Seconds left on the match clock (never negative)
    pub time_left: f32,
    pub players: [Player; 2],
    /// Active items (spawn order)
    pub items: Vec<Item>,
    /// Active projectiles (fire order)
    pub projectiles: Vec<Projectile>,
    pub difficulty: Difficulty,
    pub spawner: Spawner,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    pub end_reason: Option<EndReason>,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl MatchState {
    /// New state sitting in the menu; `tuning` should already be validated
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let players = [
            Player::new(PlayerSlot::One, &tuning),
            Player::new(PlayerSlot::Two, &tuning),
        ];
        Self {
            seed,
            matches_played: 0,
            difficulty: Difficulty::new(&tuning),
            spawner: Spawner::new(&tuning),
            time_left: tuning.match_duration,
            tuning,
            phase: MatchPhase::Menu,
            elapsed: 0.0,
            players,
            items: Vec::new(),
            projectiles: Vec::new(),
            events: Vec::new(),
            end_reason: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Reset every per-match field and enter `Playing`
    pub fn start(&mut self) {
        let match_seed = self.seed.wrapping_add(self.matches_played as u64);
        self.matches_played += 1;

        self.players = [
            Player::new(PlayerSlot::One, &self.tuning),
            Player::new(PlayerSlot::Two, &self.tuning),
        ];
        self.items.clear();
        self.projectiles.clear();
        self.difficulty = Difficulty::new(&self.tuning);
        self.spawner = Spawner::new(&self.tuning);
        self.elapsed = 0.0;
        self.time_left = self.tuning.match_duration;
        self.end_reason = None;
        self.rng = Pcg32::seed_from_u64(match_seed);
        self.next_id = 1;
        self.phase = MatchPhase::Playing;

        log::info!("Match {} started (seed {})", self.matches_played, match_seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn player(&self, slot: PlayerSlot) -> &Player {
        &self.players[slot.index()]
    }

    #[inline]
    pub fn player_mut(&mut self, slot: PlayerSlot) -> &mut Player {
        &mut self.players[slot.index()]
    }

    /// Stop the match; repeated calls are ignored
    pub fn end_match(&mut self, reason: EndReason) {
        if self.phase == MatchPhase::Over {
            return;
        }
        self.phase = MatchPhase::Over;
        self.end_reason = Some(reason);
        self.events.push(GameEvent::MatchOver(reason));
        log::info!(
            "Match over ({:?}): {} - {}",
            reason,
            self.players[0].score,
            self.players[1].score
        );
    }

    /// Higher score wins; `None` on a tie
    pub fn winner(&self) -> Option<PlayerSlot> {
        let (a, b) = (self.players[0].score, self.players[1].score);
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(PlayerSlot::One),
            std::cmp::Ordering::Less => Some(PlayerSlot::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// End-of-match numbers for display or export
    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            seed: self.seed,
            elapsed: self.elapsed,
            end_reason: self.end_reason,
            winner: self.winner(),
            players: self
                .players
                .iter()
                .map(|p| PlayerSummary {
                    slot: p.slot,
                    score: p.score,
                    form: p.form,
                    captures: p.captures.clone(),
                })
                .collect(),
        }
    }
}

/// Per-player line of a `MatchSummary`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub slot: PlayerSlot,
    pub score: i32,
    pub form: PlayerForm,
    pub captures: BTreeMap<ItemKind, u32>,
}

/// Result of a finished (or abandoned) match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSummary {
    pub seed: u64,
    pub elapsed: f32,
    pub end_reason: Option<EndReason>,
    pub winner: Option<PlayerSlot>,
    pub players: Vec<PlayerSummary>,
}
