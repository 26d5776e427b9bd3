//! Progress callback for logging training progress

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};

/// Logs epoch and step summaries through `tracing`
#[derive(Clone, Debug)]
pub struct ProgressCallback {
    log_interval: usize,
}

impl ProgressCallback {
    /// Create progress callback logging every `log_interval` steps
    pub fn new(log_interval: usize) -> Self {
        Self { log_interval }
    }
}

impl Default for ProgressCallback {
    fn default() -> Self {
        Self { log_interval: 10 }
    }
}

impl TrainerCallback for ProgressCallback {
    fn on_epoch_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        tracing::info!(
            epoch = ctx.epoch + 1,
            max_epochs = ctx.max_epochs,
            lr = ctx.lr,
            "epoch starting"
        );
        CallbackAction::Continue
    }

    fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        tracing::info!(
            epoch = ctx.epoch + 1,
            max_epochs = ctx.max_epochs,
            loss = ctx.loss,
            val_loss = ctx.val_loss,
            elapsed_secs = ctx.elapsed_secs,
            "epoch finished"
        );
        CallbackAction::Continue
    }

    fn on_step_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        if self.log_interval > 0 && ctx.step > 0 && ctx.step % self.log_interval == 0 {
            tracing::debug!(
                step = ctx.step,
                steps_per_epoch = ctx.steps_per_epoch,
                loss = ctx.loss,
                "step"
            );
        }
        CallbackAction::Continue
    }

    fn name(&self) -> &'static str {
        "ProgressCallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_callback_never_stops_training() {
        let mut progress = ProgressCallback::new(5);
        let ctx = CallbackContext { step: 5, steps_per_epoch: 100, loss: 0.5, ..Default::default() };
        assert_eq!(progress.on_epoch_begin(&ctx), CallbackAction::Continue);
        assert_eq!(progress.on_step_end(&ctx), CallbackAction::Continue);
        assert_eq!(progress.on_epoch_end(&ctx), CallbackAction::Continue);
    }
}
