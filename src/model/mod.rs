//! Models with their training state encoded in the type.
//!
//! Training goes through [`TrainableModel`]; the [`Solver`](crate::solver::Solver)
//! converts the result with [`TrainableModel::into_fitted`] into a type that
//! implements [`InferenceModel`].

pub mod linear;
pub mod state;

pub use linear::{LinearModel, LinearParams, LinearRegression};
pub use state::{Fitted, Unfitted};

use crate::backend::{Backend, Scalar};

pub trait TrainableModel<B: Backend> {
    type Input;
    type Prediction;
    type Params;
    type Gradients;
    type Output;

    fn forward(&self, input: &Self::Input) -> Self::Prediction;
    /// Gradients of the loss w.r.t. the parameters, given `∂L/∂prediction`.
    fn backward(&self, input: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients;
    fn params(&self) -> &Self::Params;
    fn update_params(&mut self, new_params: &Self::Params);

    fn into_fitted(self) -> Self::Output;
}

/// Arithmetic on parameter sets, as needed by optimizers.
pub trait ParamOps<B: Backend>: Clone {
    fn add(&self, other: &Self) -> Self;
    fn scale(&self, scalar: Scalar<B>) -> Self;
}

pub trait InferenceModel<B: Backend> {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle;
    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch;
}
