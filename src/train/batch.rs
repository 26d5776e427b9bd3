//! Batch data structure

use ndarray::{Array1, Array2};

/// A mini-batch of flattened images with sparse class labels.
///
/// One row of `inputs` per sample; `targets[i]` is the class index for
/// row `i`.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Input features, one sample per row
    pub inputs: Array2<f32>,
    /// Sparse target labels
    pub targets: Array1<usize>,
}

impl Batch {
    /// Create a new batch
    pub fn new(inputs: Array2<f32>, targets: Array1<usize>) -> Self {
        assert_eq!(inputs.nrows(), targets.len(), "one target per input row");
        Self { inputs, targets }
    }

    /// Number of samples in the batch
    pub fn size(&self) -> usize {
        self.inputs.nrows()
    }
}
