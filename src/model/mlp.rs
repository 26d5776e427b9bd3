//! Multi-layer perceptron reference model

use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Model, ModelBuilder, StepMetrics};
use crate::error::{Error, Result};
use crate::model::LinearSoftmax;
use crate::train::{Accuracy, Batch, Metric};

/// One-hidden-layer ReLU classifier with softmax output.
pub struct MlpClassifier {
    input_dim: usize,
    hidden: usize,
    num_classes: usize,
    w1: Array1<f32>,
    b1: Array1<f32>,
    w2: Array1<f32>,
    b2: Array1<f32>,
}

impl MlpClassifier {
    /// Glorot-initialized classifier with a fixed seed
    pub fn new(input_dim: usize, hidden: usize, num_classes: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut glorot = |fan_in: usize, fan_out: usize, len: usize| {
            let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
            Array1::from_iter((0..len).map(|_| rng.gen_range(-limit..limit)))
        };
        Self {
            input_dim,
            hidden,
            num_classes,
            w1: glorot(input_dim, hidden, input_dim * hidden),
            b1: Array1::zeros(hidden),
            w2: glorot(hidden, num_classes, hidden * num_classes),
            b2: Array1::zeros(num_classes),
        }
    }

    /// Hidden layer width
    pub fn hidden_units(&self) -> usize {
        self.hidden
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

    /// Hidden pre-activations and softmax probabilities for one sample
    fn forward_sample(&self, x: ArrayView1<f32>) -> (Array1<f32>, Array1<f32>) {
        let mut pre = self.b1.clone();
        for j in 0..self.hidden {
            let row = self.w1.slice(ndarray::s![j * self.input_dim..(j + 1) * self.input_dim]);
            pre[j] += row.dot(&x);
        }
        let h = pre.mapv(|v| v.max(0.0));
        let mut logits = self.b2.clone();
        for c in 0..self.num_classes {
            let row = self.w2.slice(ndarray::s![c * self.hidden..(c + 1) * self.hidden]);
            logits[c] += row.dot(&h);
        }
        (pre, LinearSoftmax::softmax(&logits))
    }

    fn probabilities(&self, batch: &Batch) -> Array2<f32> {
        let mut probs = Array2::zeros((batch.size(), self.num_classes));
        for (i, x) in batch.inputs.rows().into_iter().enumerate() {
            let (_, p) = self.forward_sample(x);
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

impl Model for MlpClassifier {
    fn backward(&mut self, batch: &Batch) -> Result<(StepMetrics, Vec<Array1<f32>>)> {
        self.check_batch(batch)?;

        let n = batch.size() as f32;
        let mut grad_w1 = Array1::<f32>::zeros(self.w1.len());
        let mut grad_b1 = Array1::<f32>::zeros(self.hidden);
        let mut grad_w2 = Array1::<f32>::zeros(self.w2.len());
        let mut grad_b2 = Array1::<f32>::zeros(self.num_classes);
        let mut probs = Array2::zeros((batch.size(), self.num_classes));

        for (i, x) in batch.inputs.rows().into_iter().enumerate() {
            let (pre, p) = self.forward_sample(x);
            probs.row_mut(i).assign(&p);
            let h = pre.mapv(|v| v.max(0.0));

            // output layer: g = (p - onehot) / n
            let mut g_logits = p;
            g_logits[batch.targets[i]] -= 1.0;
            g_logits /= n;

            let mut g_hidden = Array1::<f32>::zeros(self.hidden);
            for c in 0..self.num_classes {
                let g = g_logits[c];
                grad_b2[c] += g;
                let mut row =
                    grad_w2.slice_mut(ndarray::s![c * self.hidden..(c + 1) * self.hidden]);
                row.scaled_add(g, &h);
                let w_row = self.w2.slice(ndarray::s![c * self.hidden..(c + 1) * self.hidden]);
                g_hidden.scaled_add(g, &w_row);
            }

            // ReLU gate
            for j in 0..self.hidden {
                if pre[j] <= 0.0 {
                    g_hidden[j] = 0.0;
                }
            }

            for j in 0..self.hidden {
                let g = g_hidden[j];
                if g == 0.0 {
                    continue;
                }
                grad_b1[j] += g;
                let mut row =
                    grad_w1.slice_mut(ndarray::s![j * self.input_dim..(j + 1) * self.input_dim]);
                row.scaled_add(g, &x);
            }
        }

        let metrics = self.batch_metrics(&probs, batch);
        Ok((metrics, vec![grad_w1, grad_b1, grad_w2, grad_b2]))
    }

    fn evaluate(&self, batch: &Batch) -> Result<StepMetrics> {
        self.check_batch(batch)?;
        let probs = self.probabilities(batch);
        Ok(self.batch_metrics(&probs, batch))
    }

    fn params_mut(&mut self) -> Vec<&mut Array1<f32>> {
        vec![&mut self.w1, &mut self.b1, &mut self.w2, &mut self.b2]
    }
}

/// Builder for [`MlpClassifier`]
#[derive(Debug, Clone, Copy)]
pub struct MlpBuilder {
    /// Hidden layer width
    pub hidden: usize,
    /// Seed for weight initialization
    pub seed: u64,
}

impl Default for MlpBuilder {
    fn default() -> Self {
        Self { hidden: 300, seed: 42 }
    }
}

impl ModelBuilder for MlpBuilder {
    fn build(&self, input_dim: usize, num_classes: usize) -> Result<Box<dyn Model>> {
        if input_dim == 0 || num_classes < 2 || self.hidden == 0 {
            return Err(Error::InvalidConfiguration(format!(
                "MLP needs nonzero input/hidden and at least 2 classes, got {input_dim}x{}x{num_classes}",
                self.hidden
            )));
        }
        Ok(Box::new(MlpClassifier::new(input_dim, self.hidden, num_classes, self.seed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    fn separable_batch() -> Batch {
        let inputs = Array2::from_shape_vec(
            (4, 2),
            vec![0.0, 0.1, 0.1, 0.0, 1.0, 0.9, 0.9, 1.0],
        )
        .unwrap();
        Batch::new(inputs, Array1::from_vec(vec![0, 0, 1, 1]))
    }

    #[test]
    fn test_mlp_seeded_init_is_deterministic() {
        let a = MlpClassifier::new(4, 8, 2, 7);
        let b = MlpClassifier::new(4, 8, 2, 7);
        assert_eq!(a.w1, b.w1);
        assert_eq!(a.w2, b.w2);
    }

    #[test]
    fn test_mlp_learns_separable_data() {
        let mut model = MlpClassifier::new(2, 16, 2, 42);
        let batch = separable_batch();
        let before = model.evaluate(&batch).unwrap().loss;

        for _ in 0..200 {
            let (_, grads) = model.backward(&batch).unwrap();
            for (param, grad) in model.params_mut().into_iter().zip(&grads) {
                *param -= &(grad * 0.5);
            }
        }

        let after = model.evaluate(&batch).unwrap();
        assert!(after.loss < before);
        assert!(after.accuracy >= 0.75, "accuracy {}", after.accuracy);
    }

    #[test]
    fn test_mlp_gradient_shapes_match_params() {
        let mut model = MlpClassifier::new(3, 5, 2, 1);
        let batch = Batch::new(Array2::zeros((2, 3)), arr1(&[0usize, 1]));
        let (_, grads) = model.backward(&batch).unwrap();
        let params = model.params_mut();
        assert_eq!(grads.len(), params.len());
        for (g, p) in grads.iter().zip(&params) {
            assert_eq!(g.len(), p.len());
        }
    }

    #[test]
    fn test_mlp_builder_defaults() {
        let builder = MlpBuilder::default();
        assert_eq!(builder.hidden, 300);
        assert!(builder.build(10, 2).is_ok());
        assert!(MlpBuilder { hidden: 0, seed: 0 }.build(10, 2).is_err());
    }
}
