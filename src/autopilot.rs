//! Autopilot: plays one side from the match state alone
//!
//! Used by the headless runner and as an idle/demo mode. Chases the food it
//! can reach first, sidesteps bombs, and fires whenever something edible is
//! in the line of fire.

use glam::Vec2;

use crate::sim::{Item, ItemKind, MatchState, PlayerForm, PlayerIntent, PlayerSlot, Rect};

/// Horizontal distance under which the autopilot stops steering
const DEADZONE: f32 = 6.0;

/// How far above the player a bomb counts as a threat (px)
const THREAT_RANGE: f32 = 260.0;

/// Seconds until `item` drops to `y`, or `None` if it is not heading there
fn arrival_time(item: &Item, y: f32, speed_mult: f32) -> Option<f32> {
    let vy = item.vel.y * speed_mult;
    if vy <= 0.0 {
        return None;
    }
    let dy = y - item.rect().max().y;
    (dy >= 0.0).then(|| dy / vy)
}

fn axis(delta: f32) -> i8 {
    if delta > DEADZONE {
        1
    } else if delta < -DEADZONE {
        -1
    } else {
        0
    }
}

fn overlaps_x(a: &Rect, b: &Rect) -> bool {
    a.min().x < b.max().x && a.max().x > b.min().x
}

fn overlaps_y(a: &Rect, b: &Rect) -> bool {
    a.min().y < b.max().y && a.max().y > b.min().y
}

/// Pick this frame's intent for `slot`
pub fn intent_for(state: &MatchState, slot: PlayerSlot) -> PlayerIntent {
    let me = state.player(slot);
    let other = state.player(match slot {
        PlayerSlot::One => PlayerSlot::Two,
        PlayerSlot::Two => PlayerSlot::One,
    });
    let rect = me.rect();
    let center = rect.center();
    let speed = me.move_speed(&state.tuning).max(1.0);
    let mult = state.difficulty.fall_speed_mult;

    let mut intent = PlayerIntent::default();

    // Bombs about to land on us take priority over everything else
    let threat = state.items.iter().find(|item| {
        let r = item.rect();
        item.kind == ItemKind::Bomb
            && overlaps_x(&r.grown(12.0), &rect)
            && r.max().y <= rect.max().y
            && rect.min().y - r.max().y < THREAT_RANGE
    });
    if let Some(bomb) = threat {
        let away = if bomb.rect().center().x > center.x { -1 } else { 1 };
        intent.move_x = away;
        if me.effects.free_moving() {
            intent.move_y = 1;
        }
        return intent;
    }

    // Earliest catchable food, leaving the rest to whoever is closer
    let target = state
        .items
        .iter()
        .filter(|item| item.kind != ItemKind::Bomb)
        .filter(|item| {
            let x = item.rect().center().x;
            (x - center.x).abs() <= (x - other.rect().center().x).abs()
        })
        .filter_map(|item| {
            let r = item.rect();
            let eta = arrival_time(item, rect.min().y, mult)?;
            let travel = (r.center().x - center.x).abs() / speed;
            (travel <= eta || me.effects.free_moving()).then_some((item, eta))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(item, _)| item.rect().center());

    if let Some(goal) = target {
        let delta: Vec2 = goal - center;
        intent.move_x = axis(delta.x);
        if me.effects.free_moving() {
            intent.move_y = axis(delta.y);
        }
    } else {
        // Drift back to the starting spot
        let home = match slot {
            PlayerSlot::One => state.tuning.arena_width * 0.25,
            PlayerSlot::Two => state.tuning.arena_width * 0.75,
        };
        intent.move_x = axis(home.round() - rect.pos.x);
    }

    if me.form.rolls() && !me.effects.free_moving() && rect.max().y < state.tuning.arena_height - 1.0 {
        // Off the floor: keep rolling the same way until the track brings us back
        intent.move_x = if intent.move_x == 0 { 1 } else { intent.move_x };
    }

    intent.fire = me.form.can_fire()
        && state.items.iter().any(|item| {
            let r = item.rect();
            item.kind != ItemKind::Bomb
                && match me.form {
                    PlayerForm::Tacos => overlaps_x(&r, &rect) && r.max().y < rect.min().y,
                    _ => overlaps_y(&r, &rect),
                }
        });

    intent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{MatchPhase, TickInput, tick};
    use crate::tuning::Tuning;

    fn quiet_match() -> MatchState {
        let tuning = Tuning {
            forced_spawns: Vec::new(),
            spawn_base_rate: 1e-6,
            ..Default::default()
        };
        let mut state = MatchState::new(5, tuning);
        state.start();
        state
    }

    fn drop_item(state: &mut MatchState, kind: ItemKind, pos: Vec2) {
        let id = state.next_entity_id();
        let item = Item::new(id, kind, &state.tuning, pos, Vec2::Y, 1.0);
        state.items.push(item);
    }

    #[test]
    fn test_chases_reachable_food() {
        let mut state = quiet_match();
        drop_item(&mut state, ItemKind::Pizza, Vec2::new(450.0, 0.0));
        let intent = intent_for(&state, PlayerSlot::One);
        assert_eq!(intent.move_x, 1);
        assert_eq!(intent.move_y, 0);
    }

    #[test]
    fn test_dodges_bomb_overhead() {
        let mut state = quiet_match();
        let p = state.players[0].rect();
        drop_item(&mut state, ItemKind::Bomb, Vec2::new(p.pos.x + 30.0, p.pos.y - 150.0));
        drop_item(&mut state, ItemKind::Pizza, Vec2::new(p.pos.x + 200.0, 0.0));
        let intent = intent_for(&state, PlayerSlot::One);
        assert_eq!(intent.move_x, -1);
    }

    #[test]
    fn test_leaves_far_side_to_opponent() {
        let mut state = quiet_match();
        drop_item(&mut state, ItemKind::Burger, Vec2::new(1000.0, 0.0));
        let intent = intent_for(&state, PlayerSlot::One);
        assert_eq!(intent.move_x, 0);
    }

    #[test]
    fn test_tacos_fires_at_food_overhead() {
        let mut state = quiet_match();
        state.players[0].form = PlayerForm::Tacos;
        let p = state.players[0].rect();
        assert!(!intent_for(&state, PlayerSlot::One).fire);
        drop_item(&mut state, ItemKind::Tacos, Vec2::new(p.pos.x, 100.0));
        assert!(intent_for(&state, PlayerSlot::One).fire);
    }

    #[test]
    fn test_autopilot_match_runs_to_end() {
        let mut state = MatchState::new(77, Tuning::default());
        state.start();
        let mut frames = 0;
        while state.phase == MatchPhase::Playing {
            let input = TickInput::with_players(
                intent_for(&state, PlayerSlot::One),
                intent_for(&state, PlayerSlot::Two),
            );
            tick(&mut state, &input, 1.0 / 30.0);
            frames += 1;
            assert!(frames < 10_000);
        }
        assert_eq!(state.phase, MatchPhase::Over);
        let caught: u32 = state
            .players
            .iter()
            .flat_map(|p| p.captures.values())
            .sum();
        assert!(caught > 0);
    }
}
