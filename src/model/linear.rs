//! Softmax regression reference model

use ndarray::{Array1, Array2, ArrayView1};

use super::{Model, ModelBuilder, StepMetrics};
use crate::error::{Error, Result};
use crate::train::{Accuracy, Batch, Metric};

/// Linear classifier with softmax output and sparse cross-entropy loss.
///
/// Weights are stored flat, row-major per class, so the optimizer sees two
/// parameter arrays: weights and biases.
pub struct LinearSoftmax {
    input_dim: usize,
    num_classes: usize,
    weights: Array1<f32>,
    bias: Array1<f32>,
}

impl LinearSoftmax {
    /// Zero-initialized classifier
    pub fn new(input_dim: usize, num_classes: usize) -> Self {
        Self {
            input_dim,
            num_classes,
            weights: Array1::zeros(input_dim * num_classes),
            bias: Array1::zeros(num_classes),
        }
    }

    /// Input feature dimension
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Number of output classes
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn check_batch(&self, batch: &Batch) -> Result<()> {
        if batch.inputs.ncols() != self.input_dim {
            return Err(Error::Training(format!(
                "batch feature width {} does not match model input {}",
                batch.inputs.ncols(),
                self.input_dim
            )));
        }
        if let Some(&t) = batch.targets.iter().find(|&&t| t >= self.num_classes) {
            return Err(Error::Training(format!(
                "target class {t} out of range for {} classes",
                self.num_classes
            )));
        }
        Ok(())
    }

    fn logits(&self, x: ArrayView1<f32>) -> Array1<f32> {
        let mut out = self.bias.clone();
        for c in 0..self.num_classes {
            let row = self.weights.slice(ndarray::s![c * self.input_dim..(c + 1) * self.input_dim]);
            out[c] += row.dot(&x);
        }
        out
    }

    /// Numerically stable softmax
    pub(crate) fn softmax(x: &Array1<f32>) -> Array1<f32> {
        let max = x.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        let exp: Array1<f32> = x.mapv(|v| (v - max).exp());
        let sum = exp.sum();
        exp / sum
    }

    /// Class probabilities for every row of the batch
    fn probabilities(&self, batch: &Batch) -> Array2<f32> {
        let mut probs = Array2::zeros((batch.size(), self.num_classes));
        for (i, x) in batch.inputs.rows().into_iter().enumerate() {
            let p = Self::softmax(&self.logits(x));
            probs.row_mut(i).assign(&p);
        }
        probs
    }

    fn batch_metrics(&self, probs: &Array2<f32>, batch: &Batch) -> StepMetrics {
        let n = batch.size() as f32;
        let loss = batch
            .targets
            .iter()
            .enumerate()
            .map(|(i, &t)| -(probs[[i, t]] + 1e-10).max(f32::MIN_POSITIVE).ln())
            .sum::<f32>()
            / n;
        let accuracy = Accuracy.compute(probs, &batch.targets);
        StepMetrics { loss, accuracy }
    }
}

impl Model for LinearSoftmax {
    fn backward(&mut self, batch: &Batch) -> Result<(StepMetrics, Vec<Array1<f32>>)> {
        self.check_batch(batch)?;
        let probs = self.probabilities(batch);
        let metrics = self.batch_metrics(&probs, batch);

        // d(CE)/d(logits) = probs - onehot(target), averaged over the batch
        let n = batch.size() as f32;
        let mut grad_w = Array1::<f32>::zeros(self.weights.len());
        let mut grad_b = Array1::<f32>::zeros(self.num_classes);
        for (i, x) in batch.inputs.rows().into_iter().enumerate() {
            for c in 0..self.num_classes {
                let mut g = probs[[i, c]];
                if c == batch.targets[i] {
                    g -= 1.0;
                }
                g /= n;
                grad_b[c] += g;
                let mut row =
                    grad_w.slice_mut(ndarray::s![c * self.input_dim..(c + 1) * self.input_dim]);
                row.scaled_add(g, &x);
            }
        }

        Ok((metrics, vec![grad_w, grad_b]))
    }

    fn evaluate(&self, batch: &Batch) -> Result<StepMetrics> {
        self.check_batch(batch)?;
        let probs = self.probabilities(batch);
        Ok(self.batch_metrics(&probs, batch))
    }

    fn params_mut(&mut self) -> Vec<&mut Array1<f32>> {
        vec![&mut self.weights, &mut self.bias]
    }
}

/// Builder for [`LinearSoftmax`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearSoftmaxBuilder;

impl ModelBuilder for LinearSoftmaxBuilder {
    fn build(&self, input_dim: usize, num_classes: usize) -> Result<Box<dyn Model>> {
        if input_dim == 0 || num_classes < 2 {
            return Err(Error::InvalidConfiguration(format!(
                "classifier needs a nonzero input and at least 2 classes, got {input_dim}x{num_classes}"
            )));
        }
        Ok(Box::new(LinearSoftmax::new(input_dim, num_classes)))
    }
}
