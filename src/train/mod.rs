//! Training: configuration, batches, metrics, callbacks, and the trainer

mod batch;
pub mod callback;
mod config;
pub mod history;
mod metrics;
mod trainer;

pub use batch::Batch;
pub use config::TrainConfig;
pub use history::History;
pub use metrics::{Accuracy, Metric};
pub use trainer::{TrainOutcome, TrainedRun, Trainer, SGD_MOMENTUM};
