//! Evaluation metrics

use ndarray::{Array1, Array2};

/// Trait for evaluation metrics over per-class scores
pub trait Metric {
    /// Compute the metric given class scores (one row per sample) and
    /// sparse target labels
    fn compute(&self, scores: &Array2<f32>, targets: &Array1<usize>) -> f32;

    /// Name of the metric
    fn name(&self) -> &str;

    /// Whether higher values are better
    fn higher_is_better(&self) -> bool {
        true
    }
}

/// Fraction of samples whose argmax score matches the target label
#[derive(Debug, Clone, Copy, Default)]
pub struct Accuracy;

impl Metric for Accuracy {
    fn compute(&self, scores: &Array2<f32>, targets: &Array1<usize>) -> f32 {
        if targets.is_empty() {
            return 0.0;
        }
        let mut correct = 0usize;
        for (row, &target) in scores.rows().into_iter().zip(targets.iter()) {
            let argmax = row
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(i, _)| i);
            if argmax == Some(target) {
                correct += 1;
            }
        }
        correct as f32 / targets.len() as f32
    }

    fn name(&self) -> &str {
        "accuracy"
    }
}
