//! Schedule selection and training-mode dispatch

use super::core::Trainer;
use super::result::{TrainOutcome, TrainedRun};
use super::train_loop::fit;
use crate::error::{Error, Result};
use crate::model::ModelBuilder;
use crate::optim::{LrFinder, Sgd};
use crate::schedule::{resolve, ScheduleSpec};
use crate::train::callback::{CallbackManager, EpochScheduleCallback};
use crate::train::{Batch, TrainConfig};

/// Momentum used by every training-mode optimizer
pub const SGD_MOMENTUM: f32 = 0.9;

impl<MB: ModelBuilder> Trainer<MB> {
    /// Run the configured mode and return its outcome.
    ///
    /// With `find_lr` set, schedule selection is skipped entirely (the
    /// schedule kind is ignored, no callback is wired, no decay computed): a
    /// default-rate optimizer and the untrained model are built and the
    /// diagnostic sweep result comes back as [`TrainOutcome::Finder`].
    ///
    /// Otherwise the schedule is resolved and wired, the optimizer built
    /// with momentum 0.9 and the schedule's decay coefficient (`one_cycle`
    /// trains on a default-rate optimizer; its callback supplies the rate
    /// each batch), and the model fitted for the configured epochs with
    /// steps-per-epoch = floor(train samples / batch size), validating each
    /// epoch against the validation source.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` before anything is built, `DataUnavailable`
    /// when a batch source yields nothing, and `Training` failures from the
    /// model propagated unmodified.
    pub fn run<BT, BV, IT, IV>(mut self, train_fn: BT, val_fn: BV) -> Result<TrainOutcome>
    where
        BT: Fn() -> IT,
        IT: IntoIterator<Item = Batch>,
        BV: Fn() -> IV,
        IV: IntoIterator<Item = Batch>,
    {
        self.config.validate()?;

        let train_batches: Vec<Batch> = train_fn().into_iter().collect();
        if train_batches.is_empty() {
            return Err(Error::DataUnavailable(
                "training generator yielded no batches".to_string(),
            ));
        }

        if self.config.find_lr {
            tracing::info!("finding learning rate");
            let mut optimizer = Sgd::default_rate();
            let mut model =
                self.builder.build(self.config.input_dim(), self.config.num_classes)?;
            let result = LrFinder::new().find(model.as_mut(), &mut optimizer, &train_batches)?;
            return Ok(TrainOutcome::Finder(result));
        }

        let val_batches: Vec<Batch> = val_fn().into_iter().collect();
        if val_batches.is_empty() {
            return Err(Error::DataUnavailable(
                "validation generator yielded no batches".to_string(),
            ));
        }

        let (schedule, decay) =
            resolve(self.config.schedule, self.config.epochs, self.config.learning_rate);
        wire_schedule(&schedule, &mut self.callbacks);
        let mut optimizer = build_optimizer(&self.config, &schedule, decay);
        let mut model = self.builder.build(self.config.input_dim(), self.config.num_classes)?;

        let history = fit(
            model.as_mut(),
            &mut optimizer,
            &mut self.callbacks,
            &self.config,
            train_batches,
            &train_fn,
            &val_batches,
        )?;

        Ok(TrainOutcome::Trained(TrainedRun { model, history, schedule }))
    }
}

/// Wire the resolved schedule into the callback list.
///
/// Per-epoch function schedules go in behind the epoch-start wrapper; the
/// stateful one-cycle scheduler registers itself as the sole per-batch
/// callback; `standard` and `none` leave the list untouched (standard acts
/// through the optimizer's decay coefficient instead).
fn wire_schedule(schedule: &Option<ScheduleSpec>, callbacks: &mut CallbackManager) {
    match schedule {
        Some(
            spec @ (ScheduleSpec::Step(_) | ScheduleSpec::Linear(_) | ScheduleSpec::Poly(_)),
        ) => callbacks.add(EpochScheduleCallback::new(spec.clone())),
        Some(ScheduleSpec::OneCycle(scheduler)) => callbacks.add(scheduler.clone()),
        Some(ScheduleSpec::Standard { .. }) | None => {}
    }
}

/// SGD with momentum 0.9 and the schedule's decay, except one-cycle, whose
/// optimizer carries no configured rate or decay of its own.
fn build_optimizer(config: &TrainConfig, schedule: &Option<ScheduleSpec>, decay: f32) -> Sgd {
    match schedule {
        Some(ScheduleSpec::OneCycle(_)) => Sgd::default_rate(),
        _ => Sgd::new(config.learning_rate, SGD_MOMENTUM, decay),
    }
}
