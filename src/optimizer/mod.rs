//! Parameter update rules.

use crate::backend::{Backend, Scalar};
use crate::model::LinearParams;

/// Gradient-based optimizer over parameter type `P`.
///
/// `step` returns new parameters and leaves its inputs untouched.
pub trait Optimizer<B: Backend, P> {
    fn step(&self, params: &P, gradients: &P) -> P;
}

/// Plain gradient descent: `θ ← θ - η · ∇L(θ)`.
///
/// # Example
/// ```rust
/// use taxifare::backend::{CpuBackend, Scalar, Tensor1D};
/// use taxifare::model::LinearParams;
/// use taxifare::optimizer::{Optimizer, SGD};
///
/// let params = LinearParams {
///     weights: Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]),
///     bias: Scalar::<CpuBackend>::new(0.5),
/// };
/// let grads = LinearParams {
///     weights: Tensor1D::<CpuBackend>::new(vec![1.0, -1.0]),
///     bias: Scalar::<CpuBackend>::new(1.0),
/// };
/// let updated = SGD::<CpuBackend>::new(0.5).step(&params, &grads);
/// assert_eq!(updated.weights.to_vec(), vec![0.5, 2.5]);
/// assert_eq!(updated.bias.to_f64(), 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct SGD<B: Backend> {
    lr: Scalar<B>,
}

impl<B: Backend> SGD<B> {
    pub fn new(lr: f64) -> Self {
        Self {
            lr: Scalar::new(lr),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr.to_f64()
    }
}

impl<B: Backend> Optimizer<B, LinearParams<B>> for SGD<B> {
    fn step(&self, params: &LinearParams<B>, grads: &LinearParams<B>) -> LinearParams<B> {
        let neg_lr = Scalar::new(0.0) - self.lr;
        LinearParams {
            weights: params.weights.add(&grads.weights.scale(&neg_lr)),
            bias: params.bias - grads.bias * self.lr,
        }
    }
}
