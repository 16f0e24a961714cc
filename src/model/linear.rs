//! Linear regression with compile-time state tracking:
//! - [`LinearRegression`] = `LinearModel<B, Unfitted>`, used during training.
//! - `LinearModel<B, Fitted>`, inference only.
//!
//! The fitted model is free from training hyperparameters.

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::model::{Fitted, InferenceModel, ParamOps, TrainableModel, Unfitted};
use std::marker::PhantomData;

/// Trainable parameters of a linear model: weights and bias.
#[derive(Clone)]
pub struct LinearParams<B: Backend> {
    pub weights: Tensor1D<B>,
    pub bias: Scalar<B>,
}

impl<B: Backend> LinearParams<B> {
    pub fn zeros(n_features: usize) -> Self {
        Self {
            weights: Tensor1D::zeros(n_features),
            bias: Scalar::new(0.0),
        }
    }

    /// Squared L2 norm of the weights and bias together.
    pub fn norm_sq(&self) -> f64 {
        self.weights.dot(&self.weights).to_f64() + self.bias.to_f64().powi(2)
    }
}

impl<B: Backend> ParamOps<B> for LinearParams<B> {
    fn add(&self, other: &Self) -> Self {
        Self {
            weights: self.weights.add(&other.weights),
            bias: self.bias + other.bias,
        }
    }

    fn scale(&self, scalar: Scalar<B>) -> Self {
        Self {
            weights: self.weights.scale(&scalar),
            bias: self.bias * scalar,
        }
    }
}

/// A linear model `y = Xw + b` with its state encoded at the type level.
///
/// - `S = Unfitted`: implements [`TrainableModel`].
/// - `S = Fitted`: implements [`InferenceModel`].
///
/// `predict` on an untrained model does not compile.
#[derive(Clone)]
pub struct LinearModel<B: Backend, S> {
    params: LinearParams<B>,
    _state: PhantomData<S>,
}

impl<B: Backend, S> LinearModel<B, S> {
    pub fn n_features(&self) -> usize {
        self.params.weights.len()
    }
}

impl<B: Backend> LinearModel<B, Fitted> {
    /// Wraps trained parameters as an inference model.
    pub fn new(params: LinearParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn weights(&self) -> Vec<f64> {
        self.params.weights.to_vec()
    }

    pub fn bias(&self) -> f64 {
        self.params.bias.to_f64()
    }
}

impl<B: Backend> InferenceModel<B> for LinearModel<B, Fitted> {
    type InputSingle = Tensor1D<B>;
    type InputBatch = Tensor2D<B>;
    type OutputSingle = Scalar<B>;
    type OutputBatch = Tensor1D<B>;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle {
        self.params.weights.dot(input) + self.params.bias
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch {
        input
            .dot(&self.params.weights)
            .add_scalar(&self.params.bias)
    }
}

/// Forward pass: `X @ w + b`.
/// Backward pass: `∇w = Xᵀ · grad`, `∇b = Σ grad`.
impl<B: Backend> TrainableModel<B> for LinearModel<B, Unfitted> {
    type Params = LinearParams<B>;
    type Gradients = LinearParams<B>;
    type Prediction = Tensor1D<B>;
    type Input = Tensor2D<B>;
    type Output = LinearModel<B, Fitted>;

    fn forward(&self, x: &Self::Input) -> Self::Prediction {
        x.dot(&self.params.weights).add_scalar(&self.params.bias)
    }

    fn backward(&self, x: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients {
        LinearParams {
            weights: x.tdot(grad_output),
            bias: grad_output.sum(),
        }
    }

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn update_params(&mut self, params: &Self::Params) {
        self.params = params.clone();
    }

    fn into_fitted(self) -> LinearModel<B, Fitted> {
        LinearModel::<B, Fitted>::new(self.params)
    }
}

/// An **unfitted** linear regression model.
pub type LinearRegression<B> = LinearModel<B, Unfitted>;

impl<B: Backend> LinearRegression<B> {
    /// Zero-initialised weights and bias.
    pub fn new(n_features: usize) -> Self {
        Self::from_params(LinearParams::zeros(n_features))
    }

    /// Starts from explicit parameters.
    pub fn from_params(params: LinearParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}
