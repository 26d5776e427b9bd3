//! One-cycle learning rate scheduler
//!
//! A stateful per-batch schedule: the rate ramps linearly from a tenth of the
//! peak up to the peak over the first half of the run, back down over the
//! second half, then annihilates toward a small final rate in the last phase.
//! Unlike the per-epoch schedules this is not a pure function of the epoch
//! index; it registers as a trainer callback and supplies the rate each batch.

use std::sync::{Arc, Mutex};

use crate::train::callback::{CallbackAction, CallbackContext, TrainerCallback};

/// One-cycle per-batch scheduler seeded with a peak rate.
///
/// The realized rates are logged as they are produced and remain queryable
/// after fitting through [`OneCycle::realized_rates`]; clones share the log,
/// so the `ScheduleSpec` handed back to the caller sees the rates the
/// trainer's callback copy realized.
#[derive(Debug, Clone)]
pub struct OneCycle {
    max_rate: f32,
    start_rate: f32,
    last_rate: f32,
    total_steps: usize,
    last_steps: usize,
    half_steps: usize,
    current_step: usize,
    rates: Arc<Mutex<Vec<f32>>>,
}

impl OneCycle {
    /// Create a one-cycle scheduler peaking at `max_rate`.
    ///
    /// The run length is not known yet; it is sized from the callback
    /// context when training begins.
    pub fn new(max_rate: f32) -> Self {
        Self {
            max_rate,
            start_rate: max_rate / 10.0,
            last_rate: max_rate / 10.0 / 1000.0,
            total_steps: 0,
            last_steps: 0,
            half_steps: 0,
            current_step: 0,
            rates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Peak rate of the cycle
    pub fn max_rate(&self) -> f32 {
        self.max_rate
    }

    /// Size the cycle for a run of `total_steps` optimizer steps
    pub fn set_total_steps(&mut self, total_steps: usize) {
        self.total_steps = total_steps;
        self.last_steps = total_steps / 10 + 1;
        self.half_steps = total_steps.saturating_sub(self.last_steps) / 2;
    }

    /// Snapshot of the rates realized so far, one per batch
    pub fn realized_rates(&self) -> Vec<f32> {
        self.rates.lock().expect("rate log poisoned").clone()
    }

    fn interpolate(step: usize, from: usize, to: usize, rate_from: f32, rate_to: f32) -> f32 {
        if to == from {
            return rate_to;
        }
        (rate_to - rate_from) * (step - from) as f32 / (to - from) as f32 + rate_from
    }

    /// Rate for the given step index
    fn rate_for(&self, step: usize) -> f32 {
        if self.total_steps == 0 {
            return self.start_rate;
        }
        if step < self.half_steps {
            Self::interpolate(step, 0, self.half_steps, self.start_rate, self.max_rate)
        } else if step < 2 * self.half_steps {
            Self::interpolate(
                step,
                self.half_steps,
                2 * self.half_steps,
                self.max_rate,
                self.start_rate,
            )
        } else if step < self.total_steps {
            Self::interpolate(
                step,
                2 * self.half_steps,
                self.total_steps,
                self.start_rate,
                self.last_rate,
            )
        } else {
            self.last_rate
        }
    }
}

impl TrainerCallback for OneCycle {
    fn on_train_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        self.set_total_steps(ctx.max_epochs * ctx.steps_per_epoch);
        self.current_step = 0;
        CallbackAction::Continue
    }

    fn batch_lr(&mut self, _ctx: &CallbackContext) -> Option<f32> {
        let rate = self.rate_for(self.current_step);
        self.current_step += 1;
        self.rates.lock().expect("rate log poisoned").push(rate);
        Some(rate)
    }

    fn name(&self) -> &'static str {
        "OneCycle"
    }
}
