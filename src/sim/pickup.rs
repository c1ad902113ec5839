//! Pickup effect resolution
//!
//! Applied once per consumed item, whether a player touched it or one of
//! their shots hit it.

use super::geometry::project_perimeter_t;
use super::item::ItemKind;
use super::player::{PlayerForm, PlayerSlot};
use super::state::{EndReason, GameEvent, MatchPhase, MatchState};

/// Apply the effects of `kind` (worth `points`) to the player in `slot`
///
/// May end the match when a win score is configured; callers should stop
/// processing the frame once the phase leaves `Playing`.
pub fn apply_pickup(state: &mut MatchState, slot: PlayerSlot, kind: ItemKind, points: i32) {
    let speed_boost = state.tuning.item(kind).map_or(0.0, |d| d.speed_boost_secs);
    let tuning = &state.tuning;
    let player = &mut state.players[slot.index()];

    player.score += points;

    let mut transformed = None;
    match kind {
        ItemKind::Chicken => {
            player.effects.free_move = player.effects.free_move.max(tuning.free_move_secs);
            player.glide_to_center(tuning);
            player.bonus_streak += 1;
            if player.bonus_streak >= tuning.ultimate_streak && !player.form.is_transformed() {
                player.form = PlayerForm::Ultimate;
                transformed = Some(PlayerForm::Ultimate);
            }
        }
        ItemKind::Bomb => {
            player.effects.shrink = player.effects.shrink.max(tuning.shrink_secs);
            player.effects.free_move = 0.0;
            player.center_move = None;
            player.bonus_streak = 0;
        }
        _ => {
            player.bonus_streak = 0;
            if player.form == PlayerForm::Ultimate {
                player.base_scale =
                    (player.base_scale * (1.0 + tuning.ultimate_growth_step)).min(tuning.ultimate_max_scale);
            }
        }
    }

    if speed_boost > 0.0 {
        player.effects.speed_boost = player.effects.speed_boost.max(speed_boost);
    }

    player.record_history(kind, tuning.history_len);
    let count = player.captures.entry(kind).or_insert(0);
    *count += 1;

    // At most once: only a base-form player can transform
    if kind.is_food() && !player.form.is_transformed() && *count >= tuning.transform_threshold {
        if let Some(form) = PlayerForm::from_food(kind) {
            player.form = form;
            if form.rolls() {
                player.perimeter_t = Some(project_perimeter_t(player.pos, player.size(), tuning.arena()));
            }
            // Auto fire waits one full interval before the first shot
            if tuning.auto_fire && form.can_fire() {
                player.fire_cooldown = tuning.shot_interval;
            }
            transformed = Some(form);
        }
    }

    let score = player.score;
    if let Some(form) = transformed {
        log::info!("{:?} transformed into {:?}", slot, form);
        state.events.push(GameEvent::Transformed { player: slot, form });
    }

    if let Some(target) = state.tuning.win_score {
        if score >= target && state.phase == MatchPhase::Playing {
            state.end_match(EndReason::ScoreReached(slot));
        }
    }
}
