//! Learning rate scheduler callback

use super::traits::TrainerCallback;
use crate::schedule::ScheduleSpec;

/// Callback that installs a per-epoch schedule's rate at each epoch start.
///
/// Wraps the per-epoch function variants (`step`, `linear`, `poly`). The
/// per-batch one-cycle scheduler registers itself as a callback directly
/// instead of going through this wrapper; `standard` and `none` need no
/// callback at all.
pub struct EpochScheduleCallback {
    schedule: ScheduleSpec,
}

impl EpochScheduleCallback {
    /// Wrap a schedule for per-epoch application
    pub fn new(schedule: ScheduleSpec) -> Self {
        Self { schedule }
    }

    /// Rate the wrapped schedule prescribes for an epoch
    pub fn rate_at(&self, epoch: usize) -> Option<f32> {
        self.schedule.rate_at(epoch)
    }
}

impl TrainerCallback for EpochScheduleCallback {
    fn epoch_lr(&mut self, epoch: usize) -> Option<f32> {
        self.schedule.rate_at(epoch)
    }

    fn name(&self) -> &'static str {
        "EpochScheduleCallback"
    }
}
