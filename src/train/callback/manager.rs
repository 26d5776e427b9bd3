//! Callback manager for dispatching events to multiple callbacks

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};

/// Manages multiple callbacks and dispatches events
#[derive(Default)]
pub struct CallbackManager {
    callbacks: Vec<Box<dyn TrainerCallback>>,
}

impl CallbackManager {
    /// Create new callback manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callback
    pub fn add<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.push(Box::new(callback));
    }

    /// Check if no callbacks are registered
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Get number of callbacks
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Fire train begin event
    pub fn on_train_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        for cb in &mut self.callbacks {
            if cb.on_train_begin(ctx) == CallbackAction::Stop {
                return CallbackAction::Stop;
            }
        }
        CallbackAction::Continue
    }

    /// Fire train end event
    pub fn on_train_end(&mut self, ctx: &CallbackContext) {
        for cb in &mut self.callbacks {
            cb.on_train_end(ctx);
        }
    }

    /// Fire epoch begin event
    pub fn on_epoch_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        for cb in &mut self.callbacks {
            if cb.on_epoch_begin(ctx) == CallbackAction::Stop {
                return CallbackAction::Stop;
            }
        }
        CallbackAction::Continue
    }

    /// Fire epoch end event
    pub fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        for cb in &mut self.callbacks {
            if cb.on_epoch_end(ctx) == CallbackAction::Stop {
                return CallbackAction::Stop;
            }
        }
        CallbackAction::Continue
    }

    /// Fire step end event
    pub fn on_step_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        for cb in &mut self.callbacks {
            if cb.on_step_end(ctx) == CallbackAction::Stop {
                return CallbackAction::Stop;
            }
        }
        CallbackAction::Continue
    }

    /// Poll for a per-epoch rate; the last scheduler to answer wins
    pub fn epoch_lr(&mut self, epoch: usize) -> Option<f32> {
        self.callbacks.iter_mut().filter_map(|cb| cb.epoch_lr(epoch)).last()
    }

    /// Poll for a per-batch rate; the last scheduler to answer wins
    pub fn batch_lr(&mut self, ctx: &CallbackContext) -> Option<f32> {
        self.callbacks.iter_mut().filter_map(|cb| cb.batch_lr(ctx)).last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRate(f32);
    impl TrainerCallback for FixedRate {
        fn epoch_lr(&mut self, _epoch: usize) -> Option<f32> {
            Some(self.0)
        }
        fn name(&self) -> &'static str {
            "FixedRate"
        }
    }

    struct StopAtEpochEnd;
    impl TrainerCallback for StopAtEpochEnd {
        fn on_epoch_end(&mut self, _ctx: &CallbackContext) -> CallbackAction {
            CallbackAction::Stop
        }
        fn name(&self) -> &'static str {
            "StopAtEpochEnd"
        }
    }

    #[test]
    fn test_manager_empty_by_default() {
        let manager = CallbackManager::new();
        assert!(manager.is_empty());
        assert_eq!(manager.len(), 0);
    }

    #[test]
    fn test_manager_stop_propagates() {
        let mut manager = CallbackManager::new();
        manager.add(StopAtEpochEnd);
        let ctx = CallbackContext::default();
        assert_eq!(manager.on_epoch_begin(&ctx), CallbackAction::Continue);
        assert_eq!(manager.on_epoch_end(&ctx), CallbackAction::Stop);
    }

    #[test]
    fn test_manager_last_rate_answer_wins() {
        let mut manager = CallbackManager::new();
        manager.add(FixedRate(0.1));
        manager.add(FixedRate(0.2));
        assert_eq!(manager.epoch_lr(0), Some(0.2));
    }

    #[test]
    fn test_manager_no_scheduler_no_rate() {
        let mut manager = CallbackManager::new();
        manager.add(StopAtEpochEnd);
        assert!(manager.epoch_lr(0).is_none());
        assert!(manager.batch_lr(&CallbackContext::default()).is_none());
    }
}
