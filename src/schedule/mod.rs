//! Learning rate schedules
//!
//! Provides the schedule kinds selectable per training run:
//! - `StepDecay` - drop the rate by a factor every N epochs
//! - `PolynomialDecay` - polynomial decay to 0 (linear at power 1)
//! - `OneCycle` - stateful per-batch ramp up/down cycle
//! - standard - no schedule function, optimizer decay coefficient instead
//! - none - constant rate
//!
//! [`resolve`] performs the selection: given a parsed [`ScheduleKind`], the
//! epoch count, and the requested peak rate, it returns the [`ScheduleSpec`]
//! to run with plus the optimizer decay coefficient.

mod one_cycle;
mod polynomial;
mod step_decay;

#[cfg(test)]
mod tests;

pub use one_cycle::OneCycle;
pub use polynomial::PolynomialDecay;
pub use step_decay::StepDecay;

use serde::{Deserialize, Serialize};

/// Base rate the epoch-function schedules and standard decay run from.
///
/// Historically fixed at 0.1: the configured `learning_rate` only reaches the
/// optimizer's static rate and the one-cycle peak, never these schedules.
/// Preserved as observable behavior; see the divergence test in
/// `schedule::tests`.
pub const BASE_RATE: f32 = 0.1;

/// Multiplicative drop factor used by the step schedule
pub const STEP_FACTOR: f32 = 0.25;

/// Polynomial power used by the "poly" schedule
pub const POLY_POWER: f32 = 5.0;

/// Requested schedule kind, parsed from its string tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    /// Step-based decay
    Step,
    /// Linear decay (polynomial, power 1)
    Linear,
    /// Polynomial decay (power 5)
    Poly,
    /// One-cycle per-batch schedule
    OneCycle,
    /// Keras-style optimizer decay coefficient, no schedule function
    Standard,
    /// No schedule, no decay
    None,
}

impl ScheduleKind {
    /// Parse a schedule tag. Unrecognized tags degrade to `None` rather than
    /// erroring; a warning is logged so the fallback is visible.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "step" => Self::Step,
            "linear" => Self::Linear,
            "poly" => Self::Poly,
            "one_cycle" => Self::OneCycle,
            "standard" => Self::Standard,
            "none" => Self::None,
            other => {
                tracing::warn!(tag = other, "unrecognized schedule type, using no schedule");
                Self::None
            }
        }
    }
}

impl std::fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::Step => "step",
            Self::Linear => "linear",
            Self::Poly => "poly",
            Self::OneCycle => "one_cycle",
            Self::Standard => "standard",
            Self::None => "none",
        };
        f.write_str(tag)
    }
}

/// The schedule actually constructed for a run.
///
/// Returned to the caller alongside the trained model so the rate curve can
/// be redrawn after the fact: the function variants answer [`rate_at`]
/// queries, `Standard` exposes its decay coefficient, and `OneCycle`'s
/// realized rates are only known once fitting ran.
///
/// [`rate_at`]: ScheduleSpec::rate_at
#[derive(Debug, Clone)]
pub enum ScheduleSpec {
    /// Per-epoch step decay
    Step(StepDecay),
    /// Per-epoch linear decay
    Linear(PolynomialDecay),
    /// Per-epoch polynomial decay
    Poly(PolynomialDecay),
    /// Per-batch one-cycle scheduler (shares its rate log with the trainer's
    /// callback copy)
    OneCycle(OneCycle),
    /// Optimizer decay coefficient, no schedule function
    Standard {
        /// Decay coefficient fed to the optimizer
        decay: f32,
    },
}

impl ScheduleSpec {
    /// Rate at the given epoch for the per-epoch function variants.
    ///
    /// `OneCycle` rates are per-batch and only known after fitting (use
    /// [`realized_rates`](Self::realized_rates)); `Standard` decays inside
    /// the optimizer per step rather than by epoch. Both answer `None`.
    pub fn rate_at(&self, epoch: usize) -> Option<f32> {
        match self {
            Self::Step(s) => Some(s.rate_at(epoch)),
            Self::Linear(s) | Self::Poly(s) => Some(s.rate_at(epoch)),
            Self::OneCycle(_) | Self::Standard { .. } => None,
        }
    }

    /// Decay coefficient this schedule asks of the optimizer
    pub fn decay(&self) -> f32 {
        match self {
            Self::Standard { decay } => *decay,
            _ => 0.0,
        }
    }

    /// Per-batch rates realized by a one-cycle run, `None` for other variants
    pub fn realized_rates(&self) -> Option<Vec<f32>> {
        match self {
            Self::OneCycle(s) => Some(s.realized_rates()),
            _ => None,
        }
    }

    /// Tag of the underlying kind
    pub fn kind(&self) -> ScheduleKind {
        match self {
            Self::Step(_) => ScheduleKind::Step,
            Self::Linear(_) => ScheduleKind::Linear,
            Self::Poly(_) => ScheduleKind::Poly,
            Self::OneCycle(_) => ScheduleKind::OneCycle,
            Self::Standard { .. } => ScheduleKind::Standard,
        }
    }
}

/// Select the schedule for a run.
///
/// Returns the constructed spec (`None` for the "none" kind) and the decay
/// coefficient for the optimizer. The step interval is `epochs / 5`; for
/// fewer than 5 epochs that is 0, which [`StepDecay`] treats as "never drop".
pub fn resolve(kind: ScheduleKind, epochs: usize, learning_rate: f32) -> (Option<ScheduleSpec>, f32) {
    match kind {
        ScheduleKind::Step => {
            tracing::info!("using 'step-based' learning rate decay");
            let spec = StepDecay::new(BASE_RATE, STEP_FACTOR, epochs / 5);
            (Some(ScheduleSpec::Step(spec)), 0.0)
        }
        ScheduleKind::Linear => {
            tracing::info!("using 'linear' learning rate decay");
            let spec = PolynomialDecay::linear(epochs, BASE_RATE);
            (Some(ScheduleSpec::Linear(spec)), 0.0)
        }
        ScheduleKind::Poly => {
            tracing::info!("using 'polynomial' learning rate decay");
            let spec = PolynomialDecay::new(epochs, BASE_RATE, POLY_POWER);
            (Some(ScheduleSpec::Poly(spec)), 0.0)
        }
        ScheduleKind::OneCycle => {
            tracing::info!("using 'one cycle' learning");
            (Some(ScheduleSpec::OneCycle(OneCycle::new(learning_rate))), 0.0)
        }
        ScheduleKind::Standard => {
            tracing::info!("using 'standard' learning rate decay");
            let decay = BASE_RATE / epochs as f32;
            (Some(ScheduleSpec::Standard { decay }), decay)
        }
        ScheduleKind::None => {
            tracing::info!("no learning rate schedule being used");
            (None, 0.0)
        }
    }
}
