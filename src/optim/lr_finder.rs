//! Learning rate finder
//!
//! A short diagnostic pass that trains over exponentially increasing
//! learning rates and records the loss at each step, used to choose a good
//! starting rate before the real run.

use super::Optimizer;
use crate::error::{Error, Result};
use crate::model::Model;
use crate::train::Batch;

/// Diagnostic learning rate sweep.
///
/// One gradient step per batch, with the rate multiplied by a fixed factor
/// each step so it covers `[start_lr, end_lr]` exponentially. The recorded
/// loss is exponentially smoothed; the sweep stops early once the smoothed
/// loss blows past `stop_factor` times the best seen.
#[derive(Debug, Clone)]
pub struct LrFinder {
    start_lr: f32,
    end_lr: f32,
    stop_factor: f32,
    smoothing: f32,
}

impl Default for LrFinder {
    fn default() -> Self {
        Self { start_lr: 1e-7, end_lr: 10.0, stop_factor: 4.0, smoothing: 0.98 }
    }
}

impl LrFinder {
    /// Finder with the default sweep range
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the sweep range
    pub fn with_range(mut self, start_lr: f32, end_lr: f32) -> Self {
        self.start_lr = start_lr;
        self.end_lr = end_lr;
        self
    }

    /// Override the divergence stop factor
    pub fn with_stop_factor(mut self, stop_factor: f32) -> Self {
        self.stop_factor = stop_factor;
        self
    }

    /// Run the sweep over one pass of `batches`.
    pub fn find(
        &self,
        model: &mut dyn Model,
        optimizer: &mut dyn Optimizer,
        batches: &[Batch],
    ) -> Result<LrFinderResult> {
        if batches.is_empty() {
            return Err(Error::DataUnavailable(
                "learning rate sweep needs at least one training batch".to_string(),
            ));
        }

        let num_steps = batches.len();
        let mult = if num_steps > 1 {
            (self.end_lr / self.start_lr).powf(1.0 / (num_steps - 1) as f32)
        } else {
            1.0
        };

        let mut rates = Vec::with_capacity(num_steps);
        let mut losses = Vec::with_capacity(num_steps);
        let mut lr = self.start_lr;
        let mut avg_loss = 0.0;
        let mut best_loss = f32::INFINITY;

        for (step, batch) in batches.iter().enumerate() {
            optimizer.set_lr(lr);
            let (metrics, grads) = model.backward(batch)?;
            if !metrics.loss.is_finite() {
                // Divergence ends the sweep; everything recorded so far is
                // still useful for plotting.
                break;
            }

            let mut params = model.params_mut();
            optimizer.step(&mut params, &grads);

            avg_loss = self.smoothing * avg_loss + (1.0 - self.smoothing) * metrics.loss;
            let smooth = avg_loss / (1.0 - self.smoothing.powi(step as i32 + 1));

            if step > 0 && smooth > self.stop_factor * best_loss {
                break;
            }
            best_loss = best_loss.min(smooth);

            rates.push(lr);
            losses.push(smooth);
            lr *= mult;
        }

        Ok(LrFinderResult { rates, losses })
    }
}

/// Per-step observations from a learning rate sweep
#[derive(Debug, Clone, PartialEq)]
pub struct LrFinderResult {
    /// Learning rate at each sweep step
    pub rates: Vec<f32>,
    /// Smoothed loss at each sweep step
    pub losses: Vec<f32>,
}

impl LrFinderResult {
    /// Number of steps the sweep recorded
    pub fn steps(&self) -> usize {
        self.rates.len()
    }

    /// Suggested starting rate: a decade below the rate with the lowest
    /// smoothed loss.
    pub fn suggested_rate(&self) -> Option<f32> {
        let (best, _) = self
            .losses
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))?;
        Some(self.rates[best] / 10.0)
    }
}
