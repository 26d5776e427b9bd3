//! Training configuration

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schedule::ScheduleKind;
use crate::task::TaskSpec;

/// Configuration for one training run.
///
/// All inputs travel through this struct by value; there is no shared
/// trainer state and no reliance on the process working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Input image height
    pub height: usize,
    /// Input image width
    pub width: usize,
    /// Input channels
    pub channels: usize,
    /// Number of output classes
    pub num_classes: usize,
    /// Mini-batch size
    pub batch_size: usize,
    /// Epochs to train for (required unless `find_lr` is set)
    pub epochs: usize,
    /// Seed rate: the optimizer's static rate, and the one-cycle peak
    pub learning_rate: f32,
    /// Requested learning rate schedule
    pub schedule: ScheduleKind,
    /// Run the diagnostic rate sweep instead of training
    pub find_lr: bool,
    /// Log a step summary every N steps
    pub log_interval: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            height: 218,
            width: 178,
            channels: 3,
            num_classes: 2,
            batch_size: 32,
            epochs: 10,
            learning_rate: 0.01,
            schedule: ScheduleKind::None,
            find_lr: false,
            log_interval: 10,
        }
    }
}

impl TrainConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration preset for a coursework task
    pub fn for_task(task: &TaskSpec) -> Self {
        Self {
            height: task.height,
            width: task.width,
            num_classes: task.num_classes,
            ..Self::default()
        }
    }

    /// Set the input image shape
    pub fn with_input_shape(mut self, height: usize, width: usize, channels: usize) -> Self {
        self.height = height;
        self.width = width;
        self.channels = channels;
        self
    }

    /// Set the class count
    pub fn with_num_classes(mut self, num_classes: usize) -> Self {
        self.num_classes = num_classes;
        self
    }

    /// Set the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the epoch count
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the seed learning rate
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the schedule kind
    pub fn with_schedule(mut self, schedule: ScheduleKind) -> Self {
        self.schedule = schedule;
        self
    }

    /// Set the schedule from its string tag (unrecognized tags degrade to
    /// "none")
    pub fn with_schedule_tag(self, tag: &str) -> Self {
        self.with_schedule(ScheduleKind::parse(tag))
    }

    /// Switch to find-lr mode
    pub fn with_find_lr(mut self, find_lr: bool) -> Self {
        self.find_lr = find_lr;
        self
    }

    /// Set the step logging interval
    pub fn with_log_interval(mut self, log_interval: usize) -> Self {
        self.log_interval = log_interval;
        self
    }

    /// Flattened input dimension
    pub fn input_dim(&self) -> usize {
        self.height * self.width * self.channels
    }

    /// Fail fast on unusable combinations, before any model is built.
    pub fn validate(&self) -> Result<()> {
        if !self.find_lr && self.epochs == 0 {
            return Err(Error::InvalidConfiguration(
                "epochs must be positive when training".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "learning rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfiguration("batch size must be positive".to_string()));
        }
        if self.num_classes < 2 {
            return Err(Error::InvalidConfiguration(format!(
                "a classifier needs at least 2 classes, got {}",
                self.num_classes
            )));
        }
        if self.input_dim() == 0 {
            return Err(Error::InvalidConfiguration(
                "input shape must be nonzero in every dimension".to_string(),
            ));
        }
        Ok(())
    }
}
