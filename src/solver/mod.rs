//! Fitting the linear head.
//!
//! [`fit_least_squares`] solves ordinary least squares exactly and is the
//! default. A [`Solver`] is the iterative alternative: it combines a loss and
//! an optimizer, runs epochs over a [`Dataset`] until `max_epochs` or until
//! the epoch loss stops changing by more than `tol`, then converts the model
//! into its fitted form.

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::dataset::Dataset;
use crate::error::{FareError, Result};
use crate::loss::Loss;
use crate::model::{ParamOps, TrainableModel};
use crate::optimizer::Optimizer;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use tracing::{debug, info, warn};

pub mod ols;

pub use ols::fit_least_squares;

/// How the linear head is fitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverMethod {
    /// Exact minimum-norm least squares.
    #[default]
    LeastSquares,
    /// Full-batch or mini-batch gradient descent on the MSE.
    GradientDescent,
}

/// Solver settings as they appear in configuration files.
///
/// Everything but `method` only applies to gradient descent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub method: SolverMethod,
    pub learning_rate: f64,
    pub max_epochs: usize,
    /// Samples per update; `None` means the whole training set.
    pub batch_size: Option<usize>,
    /// Early stop once the epoch loss changes by at most this much.
    pub tol: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            method: SolverMethod::LeastSquares,
            learning_rate: 0.1,
            max_epochs: 5000,
            batch_size: None,
            tol: 1e-9,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(FareError::Config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_epochs == 0 {
            return Err(FareError::Config("max_epochs must be at least 1".into()));
        }
        if self.batch_size == Some(0) {
            return Err(FareError::Config("batch_size must be at least 1".into()));
        }
        if self.tol.is_nan() || self.tol < 0.0 {
            return Err(FareError::Config(format!(
                "tol must be non-negative, got {}",
                self.tol
            )));
        }
        Ok(())
    }
}

/// How a [`Solver::fit`] call ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitSummary {
    pub epochs: usize,
    pub final_loss: f64,
    pub converged: bool,
}

/// Orchestrates the training loop. Immutable once built, reusable across models.
pub struct Solver<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    batch_size: Option<usize>,
    max_epochs: usize,
    tol: f64,
    loss_fn: L,
    optimizer: O,
    _backend: PhantomData<B>,
    _model: PhantomData<(M, P)>,
}

/// Fluent builder for a [`Solver`].
///
/// Defaults: full batch, 5000 epochs, `tol = 1e-9`.
pub struct SolverBuilder<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    batch_size: Option<usize>,
    max_epochs: usize,
    tol: f64,
    loss_fn: L,
    optimizer: O,
    _backend: PhantomData<B>,
    _model: PhantomData<(M, P)>,
}

impl<B, L, O, M, P> SolverBuilder<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    pub fn new(loss_fn: L, optimizer: O) -> Self {
        let defaults = SolverConfig::default();
        Self {
            batch_size: defaults.batch_size,
            max_epochs: defaults.max_epochs,
            tol: defaults.tol,
            loss_fn,
            optimizer,
            _backend: PhantomData,
            _model: PhantomData,
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    pub fn full_batch(mut self) -> Self {
        self.batch_size = None;
        self
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn build(self) -> Solver<B, L, O, M, P> {
        Solver {
            batch_size: self.batch_size,
            max_epochs: self.max_epochs,
            tol: self.tol,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
            _backend: PhantomData,
            _model: PhantomData,
        }
    }
}

impl<B, L, O, M, P> Solver<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    pub fn builder(loss_fn: L, optimizer: O) -> SolverBuilder<B, L, O, M, P> {
        SolverBuilder::new(loss_fn, optimizer)
    }
}

impl<B, L, O, M, P> Solver<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B, Target = Tensor1D<B>, Prediction = Tensor1D<B>>,
    M: TrainableModel<
        B,
        Input = Tensor2D<B>,
        Prediction = Tensor1D<B>,
        Params = P,
        Gradients = P,
    >,
    O: Optimizer<B, P>,
    P: ParamOps<B>,
{
    /// Trains `model` on `dataset`.
    ///
    /// The epoch loss is the sample-weighted mean of the batch losses.
    ///
    /// # Errors
    /// [`FareError::Solver`] if the dataset is empty or of unknown length, a
    /// batch fails to load, or the loss stops being finite.
    pub fn fit<D>(&self, mut model: M, dataset: &D) -> Result<(M::Output, FitSummary)>
    where
        D: Dataset,
    {
        let n_total = dataset
            .len()
            .ok_or_else(|| FareError::Solver("dataset length unknown".into()))?;
        if n_total == 0 {
            return Err(FareError::Solver("dataset is empty".into()));
        }
        let batch_size = self.batch_size.unwrap_or(n_total);
        if batch_size == 0 {
            return Err(FareError::Solver("batch_size must be at least 1".into()));
        }

        let mut summary = FitSummary {
            epochs: 0,
            final_loss: f64::INFINITY,
            converged: false,
        };
        for epoch in 0..self.max_epochs {
            let mut total_loss = Scalar::<B>::new(0.0);
            for batch in dataset.batches::<B>(batch_size) {
                let (batch_x, batch_y) =
                    batch.map_err(|e| FareError::Solver(format!("data error: {e:?}")))?;
                let weight = Scalar::new(batch_y.len() as f64);

                let preds = model.forward(&batch_x);
                total_loss = total_loss + self.loss_fn.loss(&preds, &batch_y) * weight;
                let grad_preds = self.loss_fn.grad_wrt_prediction(&preds, &batch_y);
                let grads = model.backward(&batch_x, &grad_preds);
                let new_params = self.optimizer.step(model.params(), &grads);
                model.update_params(&new_params);
            }

            let loss = (total_loss / Scalar::new(n_total as f64)).to_f64();
            if !loss.is_finite() {
                return Err(FareError::Solver(format!(
                    "loss diverged at epoch {epoch}; lower the learning rate"
                )));
            }
            debug!(epoch, loss, "epoch finished");

            let previous = summary.final_loss;
            summary.epochs = epoch + 1;
            summary.final_loss = loss;
            if (previous - loss).abs() <= self.tol {
                summary.converged = true;
                break;
            }
        }

        if summary.converged {
            info!(
                epochs = summary.epochs,
                loss = summary.final_loss,
                "solver converged"
            );
        } else {
            warn!(
                epochs = summary.epochs,
                loss = summary.final_loss,
                "solver stopped at max_epochs before converging"
            );
        }
        Ok((model.into_fitted(), summary))
    }
}
