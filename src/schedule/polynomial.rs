//! Polynomial decay schedule

use serde::{Deserialize, Serialize};

/// Polynomial decay from `init_alpha` to 0 over `max_epochs`.
///
/// Formula: rate(epoch) = init_alpha * (1 - epoch / max_epochs)^power
///
/// Linear decay is the `power = 1` special case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolynomialDecay {
    /// Epoch count over which the rate decays to 0
    pub max_epochs: usize,
    /// Starting rate
    pub init_alpha: f32,
    /// Polynomial power
    pub power: f32,
}

impl PolynomialDecay {
    /// Create a new polynomial decay schedule
    pub fn new(max_epochs: usize, init_alpha: f32, power: f32) -> Self {
        Self { max_epochs, init_alpha, power }
    }

    /// Linear decay (power 1)
    pub fn linear(max_epochs: usize, init_alpha: f32) -> Self {
        Self::new(max_epochs, init_alpha, 1.0)
    }

    /// Rate for the given epoch index
    pub fn rate_at(&self, epoch: usize) -> f32 {
        if self.max_epochs == 0 || epoch >= self.max_epochs {
            return 0.0;
        }
        let remaining = 1.0 - epoch as f32 / self.max_epochs as f32;
        (self.init_alpha * remaining.powf(self.power)).max(0.0)
    }
}
