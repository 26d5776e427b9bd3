//! Core Trainer struct

use crate::model::ModelBuilder;
use crate::train::callback::{CallbackManager, TrainerCallback};
use crate::train::TrainConfig;

/// Orchestrates one training (or find-lr) run.
///
/// Constructed once per run from an explicit [`TrainConfig`] and a model
/// builder; [`run`](Trainer::run) consumes the trainer, so a run's artifacts
/// are never mutated afterwards.
///
/// # Example
///
/// ```no_run
/// use programar::model::LinearSoftmaxBuilder;
/// use programar::schedule::ScheduleKind;
/// use programar::train::{Batch, TrainConfig, Trainer};
///
/// let config = TrainConfig::new()
///     .with_epochs(10)
///     .with_schedule(ScheduleKind::Step);
/// let trainer = Trainer::new(config, LinearSoftmaxBuilder);
/// # let train_batches: Vec<Batch> = vec![];
/// # let val_batches: Vec<Batch> = vec![];
/// let outcome = trainer.run(|| train_batches.clone(), || val_batches.clone())?;
/// # Ok::<(), programar::Error>(())
/// ```
pub struct Trainer<MB> {
    pub(crate) config: TrainConfig,
    pub(crate) builder: MB,
    pub(crate) callbacks: CallbackManager,
}

impl<MB: ModelBuilder> Trainer<MB> {
    /// Create a trainer for one run
    pub fn new(config: TrainConfig, builder: MB) -> Self {
        Self { config, builder, callbacks: CallbackManager::new() }
    }

    /// Add a callback (progress logging, custom hooks)
    pub fn add_callback<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.add(callback);
    }

    /// The run's configuration
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Registered callbacks
    pub fn callbacks(&self) -> &CallbackManager {
        &self.callbacks
    }
}
