//! Stochastic Gradient Descent optimizer

use super::Optimizer;
use ndarray::Array1;

/// SGD with optional momentum and a per-step decay coefficient.
///
/// The decay coefficient shrinks the effective rate proportionally to
/// elapsed steps, independent of any schedule callback:
///
/// effective_lr = lr / (1 + decay * iterations)
pub struct Sgd {
    lr: f32,
    momentum: f32,
    decay: f32,
    iterations: usize,
    velocities: Vec<Option<Array1<f32>>>,
}

impl Sgd {
    /// Rate used when no rate was configured (a schedule or finder will
    /// supply the real one per step)
    pub const DEFAULT_LR: f32 = 0.01;

    /// Create a new SGD optimizer
    pub fn new(lr: f32, momentum: f32, decay: f32) -> Self {
        Self { lr, momentum, decay, iterations: 0, velocities: Vec::new() }
    }

    /// Optimizer with the default rate, no momentum, no decay
    pub fn default_rate() -> Self {
        Self::new(Self::DEFAULT_LR, 0.0, 0.0)
    }

    /// Decay coefficient
    pub fn decay(&self) -> f32 {
        self.decay
    }

    /// Momentum coefficient
    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    /// Number of optimization steps taken
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Rate in effect for the next step, after decay
    pub fn effective_lr(&self) -> f32 {
        self.lr / (1.0 + self.decay * self.iterations as f32)
    }

    fn ensure_velocities(&mut self, n: usize) {
        if self.velocities.len() != n {
            self.velocities = (0..n).map(|_| None).collect();
        }
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, params: &mut [&mut Array1<f32>], grads: &[Array1<f32>]) {
        assert_eq!(params.len(), grads.len(), "params and grads must be parallel");
        self.ensure_velocities(params.len());

        let lr = self.effective_lr();
        for (i, (param, grad)) in params.iter_mut().zip(grads).enumerate() {
            if self.momentum > 0.0 {
                // v = momentum * v - lr * grad
                let velocity = match &self.velocities[i] {
                    Some(v) => v * self.momentum - grad * lr,
                    None => grad * (-lr),
                };
                **param += &velocity;
                self.velocities[i] = Some(velocity);
            } else {
                **param -= &(grad * lr);
            }
        }
        self.iterations += 1;
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}
