//! Trainer orchestration
//!
//! [`Trainer`] owns one run: it resolves the configured schedule, builds the
//! optimizer and model, and either fits for the configured epochs or runs the
//! diagnostic rate sweep, returning a [`TrainOutcome`].

mod core;
mod dispatch;
mod result;
mod train_loop;

pub use self::core::Trainer;
pub use dispatch::SGD_MOMENTUM;
pub use result::{TrainOutcome, TrainedRun};
