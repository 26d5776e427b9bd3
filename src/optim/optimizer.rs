//! Optimizer trait

use ndarray::Array1;

/// Trait for optimization algorithms.
///
/// Parameters and their gradients arrive as parallel slices, in the order
/// the model exposes them from `params_mut`.
pub trait Optimizer: Send {
    /// Perform a single optimization step
    fn step(&mut self, params: &mut [&mut Array1<f32>], grads: &[Array1<f32>]);

    /// Get the static learning rate
    fn lr(&self) -> f32;

    /// Set the static learning rate (schedules install rates through this)
    fn set_lr(&mut self, lr: f32);
}
