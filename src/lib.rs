//! Programar: learning-rate schedules and trainer dispatch for the
//! facial-attribute coursework tasks
//!
//! The crate turns a schedule tag and a training configuration into a fitted
//! classifier or a learning-rate diagnostic:
//!
//! - [`schedule`] resolves a tag (`step`, `linear`, `poly`, `one_cycle`,
//!   `standard`, `none`) into a rate curve, a callback, or an optimizer decay
//!   coefficient
//! - [`optim`] provides the momentum SGD optimizer and the range-sweep
//!   learning-rate finder
//! - [`train`] holds the trainer, its configuration, callbacks, and per-epoch
//!   history
//! - [`model`] defines the model seam the trainer drives, with linear-softmax
//!   and one-hidden-layer MLP implementations
//! - [`task`] carries the four coursework task presets
//!
//! # Example
//!
//! ```no_run
//! use programar::model::MlpBuilder;
//! use programar::train::{Batch, TrainConfig, Trainer};
//!
//! let config = TrainConfig::new()
//!     .with_epochs(20)
//!     .with_learning_rate(0.01)
//!     .with_schedule_tag("one_cycle");
//! let trainer = Trainer::new(config, MlpBuilder::default());
//! # let train_batches: Vec<Batch> = vec![];
//! # let val_batches: Vec<Batch> = vec![];
//! let outcome = trainer.run(|| train_batches.clone(), || val_batches.clone())?;
//! if let Some(run) = outcome.into_trained() {
//!     println!("trained {} epochs", run.history.epochs());
//! }
//! # Ok::<(), programar::Error>(())
//! ```

pub mod error;
pub mod model;
pub mod optim;
pub mod schedule;
pub mod task;
pub mod train;

pub use error::{Error, Result};
