//! Item spawning: weighted type draw, placement and the spawn accumulators

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::item::{Item, ItemKind};
use super::state::MatchState;
use crate::tuning::{ItemDef, SpawnMode, Tuning};

/// Cumulative-weight lookup for a uniform draw `r` in `[0, 1)`
///
/// Returns the first kind whose running weight exceeds `r`; the last entry
/// catches float rounding at the top end.
pub fn pick_kind(catalog: &[ItemDef], r: f32) -> Option<ItemKind> {
    let mut acc = 0.0;
    for def in catalog {
        acc += def.weight;
        if r < acc {
            return Some(def.kind);
        }
    }
    catalog.last().map(|d| d.kind)
}

/// Starting position and unit travel direction for a new item
pub fn place<R: Rng>(kind: ItemKind, tuning: &Tuning, rng: &mut R) -> (Vec2, Vec2) {
    let arena = tuning.arena();
    let size = tuning.item(kind).map(|d| d.size()).unwrap_or(Vec2::splat(56.0));
    let span = (arena - size).max(Vec2::ZERO);

    match tuning.spawn_mode {
        SpawnMode::Falling => (Vec2::new(rng.random::<f32>() * span.x, -size.y), Vec2::Y),
        SpawnMode::Edges => {
            let (pos, inward) = match rng.random_range(0..4u8) {
                0 => (Vec2::new(rng.random::<f32>() * span.x, -size.y), Vec2::Y),
                1 => (Vec2::new(rng.random::<f32>() * span.x, arena.y), Vec2::NEG_Y),
                2 => (Vec2::new(-size.x, rng.random::<f32>() * span.y), Vec2::X),
                _ => (Vec2::new(arena.x, rng.random::<f32>() * span.y), Vec2::NEG_X),
            };
            // Keep strictly under 90 degrees so every entry points inward
            let spread = tuning.edge_spread.clamp(0.0, 1.5);
            let angle = rng.random_range(-spread..=spread);
            (pos, Vec2::from_angle(angle).rotate(inward))
        }
    }
}

/// Spawn accumulators: the weighted stream plus forced channels
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    /// Fractional items owed by the weighted stream
    pub acc: f32,
    /// One accumulator per `Tuning::forced_spawns` entry
    pub forced: Vec<f32>,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            acc: 0.0,
            forced: vec![0.0; tuning.forced_spawns.len()],
        }
    }
}

/// Create one item of `kind` at a fresh spawn point
fn spawn_one(state: &mut MatchState, kind: ItemKind) {
    let (pos, dir) = place(kind, &state.tuning, &mut state.rng);
    let jitter = state.tuning.speed_jitter;
    let variation = 1.0 - jitter + state.rng.random::<f32>() * 2.0 * jitter;
    let id = state.next_entity_id();
    state
        .items
        .push(Item::new(id, kind, &state.tuning, pos, dir, variation));
}

/// Advance the spawn accumulators and create whatever is owed
///
/// Forced channels go first and bypass the weighted stream. Nothing is ever
/// queued past the item cap: a forced spawn at cap is dropped, and the
/// weighted stream stops accruing while the arena is full.
pub fn spawn_step(state: &mut MatchState, dt: f32) {
    let cap = state.tuning.max_items;

    for channel in 0..state.spawner.forced.len() {
        let Some(forced) = state.tuning.forced_spawns.get(channel) else {
            continue;
        };
        let (kind, period) = (forced.kind, forced.period);
        state.spawner.forced[channel] += dt / period;
        while state.spawner.forced[channel] >= 1.0 {
            state.spawner.forced[channel] -= 1.0;
            if state.items.len() < cap {
                log::debug!("Forced spawn: {:?}", kind);
                spawn_one(state, kind);
            } else {
                log::trace!("Forced spawn of {:?} skipped at cap", kind);
            }
        }
    }

    if state.items.len() >= cap {
        return;
    }
    state.spawner.acc += dt * state.difficulty.spawn_rate;
    while state.spawner.acc >= 1.0 && state.items.len() < cap {
        state.spawner.acc -= 1.0;
        let r = state.rng.random::<f32>();
        let Some(kind) = pick_kind(&state.tuning.catalog, r) else {
            return;
        };
        spawn_one(state, kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::ForcedSpawn;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_pick_kind_cumulative() {
        let catalog = Tuning::default().catalog;
        assert_eq!(pick_kind(&catalog, 0.0), Some(ItemKind::Pizza));
        assert_eq!(pick_kind(&catalog, 0.2074), Some(ItemKind::Pizza));
        assert_eq!(pick_kind(&catalog, 0.2076), Some(ItemKind::Burger));
        assert_eq!(pick_kind(&catalog, 0.84), Some(ItemKind::Chicken));
        assert_eq!(pick_kind(&catalog, 0.95), Some(ItemKind::Bomb));
    }

    #[test]
    fn test_pick_kind_rounding_fallback() {
        let mut catalog = Tuning::default().catalog;
        for def in &mut catalog {
            def.weight *= 0.999;
        }
        assert_eq!(pick_kind(&catalog, 0.9999), Some(ItemKind::Bomb));
        assert_eq!(pick_kind(&[], 0.5), None);
    }

    #[test]
    fn test_weighted_distribution_roughly_matches() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut bombs = 0;
        let mut chickens = 0;
        let n = 20_000;
        for _ in 0..n {
            match pick_kind(&tuning.catalog, rng.random::<f32>()) {
                Some(ItemKind::Bomb) => bombs += 1,
                Some(ItemKind::Chicken) => chickens += 1,
                _ => {}
            }
        }
        let bomb_rate = bombs as f32 / n as f32;
        let chicken_rate = chickens as f32 / n as f32;
        assert!((bomb_rate - 0.12).abs() < 0.02, "bomb rate {bomb_rate}");
        assert!((chicken_rate - 0.05).abs() < 0.015, "chicken rate {chicken_rate}");
    }

    #[test]
    fn test_falling_placement_above_top() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            let (pos, dir) = place(ItemKind::Chicken, &tuning, &mut rng);
            assert!(pos.x >= 0.0 && pos.x <= 1280.0 - 60.0);
            assert_eq!(pos.y, -60.0);
            assert_eq!(dir, Vec2::Y);
        }
    }

    #[test]
    fn test_edge_placement_points_inward() {
        let tuning = Tuning {
            spawn_mode: SpawnMode::Edges,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..500 {
            let (pos, dir) = place(ItemKind::Pizza, &tuning, &mut rng);
            assert!((dir.length() - 1.0).abs() < 1e-4);
            // Moving along `dir` from an edge must head into the arena
            let inward = if pos.y < 0.0 {
                Vec2::Y
            } else if pos.y >= tuning.arena_height {
                Vec2::NEG_Y
            } else if pos.x < 0.0 {
                Vec2::X
            } else {
                Vec2::NEG_X
            };
            assert!(dir.dot(inward) > 0.0, "{pos:?} {dir:?}");
        }
    }

    #[test]
    fn test_spawn_cap_scenario() {
        // dt = 1/spawnRate for 1000 frames, nothing removing items
        let tuning = Tuning {
            forced_spawns: Vec::new(),
            ..Default::default()
        };
        let mut state = MatchState::new(42, tuning);
        let dt = 1.0 / state.difficulty.spawn_rate;
        for _ in 0..1000 {
            spawn_step(&mut state, dt);
            assert!(state.items.len() <= 60);
        }
        assert_eq!(state.items.len(), 60);
    }

    #[test]
    fn test_forced_channel_guarantees_kind() {
        let tuning = Tuning {
            forced_spawns: vec![ForcedSpawn {
                kind: ItemKind::Chicken,
                period: 2.0,
            }],
            spawn_base_rate: 0.001,
            ..Default::default()
        };
        let mut state = MatchState::new(5, tuning);
        for _ in 0..50 {
            spawn_step(&mut state, 0.05);
        }
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].kind, ItemKind::Chicken);
        assert!(state.spawner.forced[0] < 1.0);
    }

    #[test]
    fn test_forced_spawn_dropped_at_cap() {
        let tuning = Tuning {
            forced_spawns: vec![ForcedSpawn {
                kind: ItemKind::Chicken,
                period: 1.0,
            }],
            max_items: 1,
            ..Default::default()
        };
        let mut state = MatchState::new(5, tuning);
        spawn_step(&mut state, 1.0);
        spawn_step(&mut state, 1.0);
        assert_eq!(state.items.len(), 1);
        assert!(state.spawner.forced[0] < 1.0);
    }

    proptest! {
        #[test]
        fn prop_cap_never_exceeded(
            seed in any::<u64>(),
            max_items in 1usize..80,
            dts in proptest::collection::vec(0.0f32..3.0, 1..300),
        ) {
            let tuning = Tuning { max_items, spawn_base_rate: 3.5, ..Default::default() };
            let mut state = MatchState::new(seed, tuning);
            for dt in dts {
                spawn_step(&mut state, dt);
                prop_assert!(state.items.len() <= max_items);
            }
        }
    }
}
