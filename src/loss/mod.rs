//! Differentiable loss functions for model training.

use crate::backend::{Backend, Scalar, Tensor1D};

/// A differentiable loss.
///
/// `loss` gives the scalar value for logging and early stopping;
/// `grad_wrt_prediction` is what gets passed to the model's `backward()`.
pub trait Loss<B: Backend> {
    type Prediction;
    type Target;

    fn loss(&self, prediction: &Self::Prediction, target: &Self::Target) -> Scalar<B>;

    /// ∂L/∂prediction.
    fn grad_wrt_prediction(
        &self,
        prediction: &Self::Prediction,
        target: &Self::Target,
    ) -> Self::Prediction;
}

/// Mean squared error: `L = (1/n) * Σ(pred_i - target_i)²`.
///
/// The gradient is `(pred - target) / n`; the factor of 2 is absorbed into
/// the learning rate.
#[derive(Clone, Copy, Debug, Default)]
pub struct MSELoss;

impl<B: Backend> Loss<B> for MSELoss {
    type Prediction = Tensor1D<B>;
    type Target = Tensor1D<B>;

    fn loss(&self, pred: &Self::Prediction, target: &Self::Target) -> Scalar<B> {
        let diff = pred.sub(target);
        diff.dot(&diff) / Scalar::new(diff.len() as f64)
    }

    fn grad_wrt_prediction(&self, pred: &Self::Prediction, target: &Self::Target) -> Tensor1D<B> {
        pred.sub(target).scale(&Scalar::new(1.0 / pred.len() as f64))
    }
}
