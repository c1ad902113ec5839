//! Per-frame simulation tick
//!
//! Phase machine plus the ordered gameplay pipeline. The order of the
//! pipeline stages is what defines the collision tie-breaks.

use glam::Vec2;

use super::geometry::{Rect, intersects};
use super::input::PlayerIntent;
use super::item::{Projectile, ShotKind};
use super::pickup::apply_pickup;
use super::player::{PlayerForm, PlayerSlot};
use super::spawn::spawn_step;
use super::state::{EndReason, GameEvent, MatchPhase, MatchState};
use crate::clamp_dt;
use crate::tuning::SpawnMode;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Per-player intents, indexed by `PlayerSlot::index`
    pub players: [PlayerIntent; 2],
    /// Leave the menu and start a match
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Back to the menu (from pause or game over)
    pub menu: bool,
    /// Rematch after game over
    pub replay: bool,
}

impl TickInput {
    pub fn with_players(p1: PlayerIntent, p2: PlayerIntent) -> Self {
        Self {
            players: [p1, p2],
            ..Default::default()
        }
    }
}

/// Advance the match by one frame of `dt` seconds
///
/// `dt` is clamped to `[0, MAX_DT]`. Phase triggers are handled first; a
/// frame that changes phase runs no gameplay. Only `Playing` runs the
/// pipeline:
///
///  1. Advance the clock; time up ends the match and skips the rest
///  2. Difficulty ramp step check
///  3. Read both player intents
///  4. Tick effect timers and fire cooldowns
///  5. Pick each player's movement mode (free 2D, perimeter roll, horizontal)
///  6. Normalize and integrate movement
///  7. Fire projectiles
///  8. Recompute aggregate scale
///  9. Recompute resting baselines
///  10. Settle to the baseline, or roll along the perimeter
///  11. Tacos hop, then clamp to the arena
///  12. Spawn items
///  13. Move items, player 1 then player 2 catches, prune off-screen items
///  14. Move projectiles, prune, then projectile-item hits
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) {
    state.events.clear();
    let dt = clamp_dt(dt);

    match state.phase {
        MatchPhase::Menu => {
            if input.start {
                state.start();
            }
            return;
        }
        MatchPhase::Paused => {
            if input.pause {
                state.phase = MatchPhase::Playing;
                log::info!("Resumed");
            } else if input.menu {
                state.phase = MatchPhase::Menu;
                log::info!("Back to menu");
            }
            return;
        }
        MatchPhase::Over => {
            if input.replay {
                state.start();
            } else if input.menu {
                state.phase = MatchPhase::Menu;
                log::info!("Back to menu");
            }
            return;
        }
        MatchPhase::Playing => {
            if input.pause {
                state.phase = MatchPhase::Paused;
                log::info!("Paused at {:.1}s left", state.time_left);
                return;
            }
        }
    }

    // 1. Clock
    state.elapsed += dt;
    state.time_left = (state.time_left - dt).max(0.0);
    if state.time_left <= 0.0 {
        state.end_match(EndReason::TimeUp);
        return;
    }

    // 2. Difficulty
    if state.difficulty.update(state.elapsed, &state.tuning) {
        state.events.push(GameEvent::DifficultyUp {
            spawn_rate: state.difficulty.spawn_rate,
            fall_speed_mult: state.difficulty.fall_speed_mult,
        });
    }

    // 3. Intents
    let intents = input.players;

    // 4. Timers
    for player in &mut state.players {
        player.effects.tick(dt);
        player.fire_cooldown = (player.fire_cooldown - dt).max(0.0);
    }

    // 5-6. Movement
    let mut roll_signs = [0.0_f32; 2];
    for (i, player) in state.players.iter_mut().enumerate() {
        let raw = intents[i].direction();
        let dir = if player.effects.free_moving() {
            raw
        } else if player.form.rolls() {
            roll_signs[i] = raw.x;
            Vec2::ZERO
        } else {
            Vec2::new(raw.x, 0.0)
        };
        player.update(dir.normalize_or_zero(), dt, &state.tuning);
    }

    // 7. Firing
    for slot in PlayerSlot::ALL {
        try_fire(state, slot, intents[slot.index()].fire);
    }

    // 8-11. Scale, baseline, grounding, hop
    let tuning = &state.tuning;
    for (i, player) in state.players.iter_mut().enumerate() {
        player.recompute_scale(tuning);
        player.refresh_baseline(tuning);

        if player.effects.free_moving() {
            // Re-projected from wherever free movement leaves the player
            player.perimeter_t = None;
        } else if player.form.rolls() {
            player.roll(roll_signs[i], dt, tuning);
        } else {
            player.settle(dt, tuning);
            if player.form.hops() {
                player.apply_hop(tuning);
            }
        }
        player.confine(tuning.arena());
    }

    // 12. Spawning
    spawn_step(state, dt);

    // 13. Items
    if !update_items(state, dt) {
        return;
    }

    // 14. Projectiles
    update_projectiles(state, dt);
}

/// Spawn a projectile for `slot` if its form, cooldown and the shot cap allow
fn try_fire(state: &mut MatchState, slot: PlayerSlot, wants: bool) {
    let tuning = &state.tuning;
    let player = &state.players[slot.index()];
    if !player.form.can_fire()
        || !(wants || tuning.auto_fire)
        || player.fire_cooldown > 0.0
        || state.projectiles.len() >= tuning.max_shots
    {
        return;
    }

    let rect = player.rect();
    let side = (rect.size.x / 3.0).round().max(4.0);
    let size = Vec2::splat(side);
    let kind = player.next_shot;
    // Shots start overlapping the player slightly
    const OVERLAP: f32 = 4.0;

    let (pos, dir) = match player.form {
        PlayerForm::Tacos => (
            Vec2::new(rect.center().x - side * 0.5, rect.pos.y - side + OVERLAP),
            Vec2::NEG_Y,
        ),
        _ => {
            let y = rect.center().y - side * 0.5;
            match kind {
                ShotKind::Salad => (Vec2::new(rect.pos.x - side + OVERLAP, y), Vec2::NEG_X),
                ShotKind::Tomato => (Vec2::new(rect.max().x - OVERLAP, y), Vec2::X),
            }
        }
    };
    let vel = dir * tuning.shot_speed;
    let ttl = tuning.shot_lifetime;
    let interval = tuning.shot_interval;

    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        owner: slot,
        kind,
        pos,
        size,
        vel,
        ttl,
    });
    let player = state.player_mut(slot);
    player.fire_cooldown = interval;
    player.next_shot = kind.next();
    state.events.push(GameEvent::ShotFired { player: slot, kind });
}

/// Whether an item has drifted far enough out to be dropped without effect
fn item_gone(rect: &Rect, mode: SpawnMode, arena: Vec2, margin: f32) -> bool {
    match mode {
        SpawnMode::Falling => rect.pos.y > arena.y + margin,
        SpawnMode::Edges => rect.outside(arena, margin),
    }
}

/// Move items and resolve player catches; false if the match ended
fn update_items(state: &mut MatchState, dt: f32) -> bool {
    let speed_mult = state.difficulty.fall_speed_mult;
    let pad = state.tuning.collision_pad;
    let arena = state.tuning.arena();
    let (mode, margin) = (state.tuning.spawn_mode, state.tuning.offscreen_margin);

    let mut i = 0;
    while i < state.items.len() {
        state.items[i].update(dt, speed_mult);
        let rect = state.items[i].rect();

        let catcher = PlayerSlot::ALL
            .into_iter()
            .find(|slot| intersects(&state.player(*slot).rect(), &rect, pad));

        if let Some(slot) = catcher {
            let item = state.items.remove(i);
            state.events.push(GameEvent::ItemCaught {
                player: slot,
                kind: item.kind,
                points: item.points,
            });
            apply_pickup(state, slot, item.kind, item.points);
            if state.phase != MatchPhase::Playing {
                return false;
            }
            continue;
        }

        if item_gone(&rect, mode, arena, margin) {
            state.items.remove(i);
            continue;
        }
        i += 1;
    }
    true
}

/// Move shots and resolve hits; the earliest-spawned overlapping item wins
fn update_projectiles(state: &mut MatchState, dt: f32) {
    let pad = state.tuning.collision_pad;
    let arena = state.tuning.arena();
    let margin = state.tuning.offscreen_margin;

    let mut si = 0;
    while si < state.projectiles.len() {
        let shot = &mut state.projectiles[si];
        shot.update(dt);
        let rect = shot.rect();
        if shot.expired() || rect.outside(arena, margin) {
            state.projectiles.remove(si);
            continue;
        }

        let hit = state
            .items
            .iter()
            .position(|item| intersects(&rect, &item.rect(), pad));
        let Some(ii) = hit else {
            si += 1;
            continue;
        };

        let shot = state.projectiles.remove(si);
        let item = state.items.remove(ii);
        state.events.push(GameEvent::ShotHit {
            player: shot.owner,
            kind: item.kind,
            points: item.points,
        });
        apply_pickup(state, shot.owner, item.kind, item.points);
        if state.phase != MatchPhase::Playing {
            return;
        }
    }
}
