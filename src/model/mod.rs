//! Model collaborator boundary
//!
//! The trainer never computes gradients itself; it drives a [`Model`] built
//! by a [`ModelBuilder`]. Reference implementations for the classifier
//! variants live here ([`LinearSoftmax`], [`MlpClassifier`]); anything that
//! satisfies the trait can be trained.

mod linear;
mod mlp;

pub use linear::{LinearSoftmax, LinearSoftmaxBuilder};
pub use mlp::{MlpBuilder, MlpClassifier};

use ndarray::Array1;

use crate::error::Result;
use crate::train::Batch;

/// Loss and accuracy observed on one batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepMetrics {
    /// Mean loss over the batch
    pub loss: f32,
    /// Fraction of correct argmax predictions
    pub accuracy: f32,
}

/// A classifier being fitted.
///
/// Implementations own their parameters and compute gradients; the trainer
/// supplies batches and applies optimizer updates. Gradients come back in
/// the same order `params_mut` exposes the parameter arrays.
pub trait Model: Send {
    /// Forward and backward pass on one batch
    fn backward(&mut self, batch: &Batch) -> Result<(StepMetrics, Vec<Array1<f32>>)>;

    /// Forward pass only, without touching parameters
    fn evaluate(&self, batch: &Batch) -> Result<StepMetrics>;

    /// Flat views of the trainable parameter arrays
    fn params_mut(&mut self) -> Vec<&mut Array1<f32>>;
}

/// Builds an untrained model for a given input size and class count
pub trait ModelBuilder {
    /// Construct the untrained classifier
    fn build(&self, input_dim: usize, num_classes: usize) -> Result<Box<dyn Model>>;
}
