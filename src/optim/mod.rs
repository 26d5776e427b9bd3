//! Optimizer and learning rate finder

mod lr_finder;
mod optimizer;
mod sgd;

pub use lr_finder::{LrFinder, LrFinderResult};
pub use optimizer::Optimizer;
pub use sgd::Sgd;
