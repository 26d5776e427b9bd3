//! Training callbacks
//!
//! Callbacks hook into training events; schedule callbacks additionally
//! answer rate polls at epoch or step boundaries.

mod manager;
mod progress;
mod scheduler;
mod traits;

pub use manager::CallbackManager;
pub use progress::ProgressCallback;
pub use scheduler::EpochScheduleCallback;
pub use traits::{CallbackAction, CallbackContext, TrainerCallback};
