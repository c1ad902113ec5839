//! Time-based difficulty ramp
//!
//! Every `difficulty_interval` seconds the spawn rate goes up by a fixed step
//! and the fall-speed multiplier by a fixed percentage, both capped. The ramp
//! never goes back down.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Difficulty {
    /// Items per second
    pub spawn_rate: f32,
    pub fall_speed_mult: f32,
    /// Last interval index already applied
    pub last_step: u32,
}

impl Difficulty {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            spawn_rate: tuning.spawn_base_rate.min(tuning.max_spawn_rate),
            fall_speed_mult: 1.0_f32.min(tuning.max_fall_speed_mult),
            last_step: 0,
        }
    }

    /// Apply at most one ramp step for `elapsed` match seconds
    ///
    /// Returns true when a step was applied this call.
    pub fn update(&mut self, elapsed: f32, tuning: &Tuning) -> bool {
        let step = (elapsed / tuning.difficulty_interval).floor() as u32;
        if step <= self.last_step {
            return false;
        }
        self.last_step = step;
        self.spawn_rate = (self.spawn_rate + tuning.spawn_rate_step).min(tuning.max_spawn_rate);
        self.fall_speed_mult =
            (self.fall_speed_mult * (1.0 + tuning.fall_speed_step)).min(tuning.max_fall_speed_mult);
        log::debug!(
            "Difficulty step {}: spawn rate {:.2}/s, fall speed x{:.3}",
            step,
            self.spawn_rate,
            self.fall_speed_mult
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_step_before_interval() {
        let tuning = Tuning::default();
        let mut diff = Difficulty::new(&tuning);
        assert!(!diff.update(19.99, &tuning));
        assert_eq!(diff.spawn_rate, 1.2);
        assert_eq!(diff.fall_speed_mult, 1.0);
    }

    #[test]
    fn test_step_is_one_shot() {
        let tuning = Tuning::default();
        let mut diff = Difficulty::new(&tuning);
        assert!(diff.update(20.0, &tuning));
        assert!(!diff.update(20.5, &tuning));
        assert!(!diff.update(39.9, &tuning));
        assert!((diff.spawn_rate - 1.35).abs() < 1e-5);
        assert!((diff.fall_speed_mult - 1.05).abs() < 1e-5);
        assert!(diff.update(40.0, &tuning));
        assert!((diff.fall_speed_mult - 1.1025).abs() < 1e-5);
    }

    #[test]
    fn test_ramp_saturates() {
        let tuning = Tuning::default();
        let mut diff = Difficulty::new(&tuning);
        let mut prev = (diff.spawn_rate, diff.fall_speed_mult);
        for i in 1..=200 {
            diff.update(i as f32 * 20.0, &tuning);
            assert!(diff.spawn_rate >= prev.0 && diff.fall_speed_mult >= prev.1);
            prev = (diff.spawn_rate, diff.fall_speed_mult);
        }
        assert_eq!(diff.spawn_rate, tuning.max_spawn_rate);
        assert_eq!(diff.fall_speed_mult, tuning.max_fall_speed_mult);
    }
}
