//! Crate error types

use thiserror::Error;

/// Training pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Unusable combination of epochs/schedule/learning rate, detected before
    /// any model is constructed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Empty or missing training/validation batch source.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// Failure surfaced by the model during fitting, propagated unmodified.
    #[error("training failure: {0}")]
    Training(String),
}

/// Result type for training operations
pub type Result<T> = std::result::Result<T, Error>;
