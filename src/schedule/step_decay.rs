//! Step decay schedule

use serde::{Deserialize, Serialize};

/// Step decay: multiply the rate by `factor` every `drop_every` epochs.
///
/// Formula: rate(epoch) = init_alpha * factor^(epoch / drop_every)
///
/// A `drop_every` of 0 (which falls out of `epochs / 5` for epochs < 5)
/// means the rate never drops and stays at `init_alpha`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepDecay {
    /// Starting rate
    pub init_alpha: f32,
    /// Multiplicative drop factor
    pub factor: f32,
    /// Drop the rate every N epochs
    pub drop_every: usize,
}

impl StepDecay {
    /// Create a new step decay schedule
    pub fn new(init_alpha: f32, factor: f32, drop_every: usize) -> Self {
        Self { init_alpha, factor, drop_every }
    }

    /// Rate for the given epoch index
    pub fn rate_at(&self, epoch: usize) -> f32 {
        if self.drop_every == 0 {
            return self.init_alpha;
        }
        let num_drops = epoch / self.drop_every;
        self.init_alpha * self.factor.powi(num_drops as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_step_decay_holds_between_drops() {
        let schedule = StepDecay::new(0.1, 0.25, 2);
        assert_abs_diff_eq!(schedule.rate_at(0), 0.1, epsilon = 1e-8);
        assert_abs_diff_eq!(schedule.rate_at(1), 0.1, epsilon = 1e-8);
        assert_abs_diff_eq!(schedule.rate_at(2), 0.025, epsilon = 1e-8);
        assert_abs_diff_eq!(schedule.rate_at(3), 0.025, epsilon = 1e-8);
    }

    #[test]
    fn test_step_decay_underflows_to_zero_far_past_the_run() {
        // 0.25^400 is below f32's smallest subnormal; the rate bottoms out at
        // exactly 0.0 instead of going negative or NaN
        let schedule = StepDecay::new(0.1, 0.25, 1);
        assert_eq!(schedule.rate_at(400), 0.0);
        for epoch in [50, 100, 400, 10_000] {
            assert!(schedule.rate_at(epoch) >= 0.0);
        }
    }

    #[test]
    fn test_step_decay_zero_interval_never_drops() {
        let schedule = StepDecay::new(0.1, 0.25, 0);
        for epoch in 0..100 {
            assert_abs_diff_eq!(schedule.rate_at(epoch), 0.1, epsilon = 1e-8);
        }
    }
}
