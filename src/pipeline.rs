//! Feature pipeline plus linear-regression head, fitted as one unit.
//!
//! The head is ordinary least squares on the design matrix, solved exactly by
//! default. With [`SolverMethod::GradientDescent`] a fit that stops at
//! `max_epochs` without converging is an error rather than an underfit model.

use crate::backend::{Backend, Tensor2D};
use crate::dataset::{InMemoryDataset, RideFrame};
use crate::error::{FareError, Result};
use crate::features::{feature_pipeline, FeaturePipeline, FittedFeaturePipeline};
use crate::loss::MSELoss;
use crate::model::{Fitted, InferenceModel, LinearModel, LinearParams, LinearRegression};
use crate::optimizer::SGD;
use crate::preprocessing::{FittedTransformer, Transformer};
use crate::solver::{fit_least_squares, FitSummary, Solver, SolverConfig, SolverMethod};
use chrono_tz::Tz;
use tracing::info;

type LinearSolver<B> = Solver<B, MSELoss, SGD<B>, LinearRegression<B>, LinearParams<B>>;

/// Unfitted fare model: feature pipeline and solver settings.
#[derive(Clone)]
pub struct FarePipeline<B: Backend> {
    features: FeaturePipeline<B>,
    solver: SolverConfig,
}

impl<B: Backend> FarePipeline<B> {
    pub fn new(timezone: Tz, solver: SolverConfig) -> Self {
        Self {
            features: feature_pipeline(timezone),
            solver,
        }
    }

    pub fn features(&self) -> &FeaturePipeline<B> {
        &self.features
    }

    fn solver(&self) -> LinearSolver<B> {
        let builder = LinearSolver::<B>::builder(MSELoss, SGD::new(self.solver.learning_rate))
            .max_epochs(self.solver.max_epochs)
            .tol(self.solver.tol);
        let builder = match self.solver.batch_size {
            Some(size) => builder.batch_size(size),
            None => builder.full_batch(),
        };
        builder.build()
    }

    /// Learns scaler statistics, one-hot vocabularies and linear weights
    /// from `x` and `y` only.
    pub fn fit(&self, x: &RideFrame, y: &[f64]) -> Result<FittedFarePipeline<B>> {
        if x.n_rows() != y.len() {
            return Err(FareError::ShapeMismatch {
                context: "feature rows vs target length",
                left: x.n_rows(),
                right: y.len(),
            });
        }

        let features = self.features.fit(x)?;
        let design = features.transform(x)?;
        info!(
            rows = x.n_rows(),
            n_features = features.n_features_out(),
            "feature pipeline fitted"
        );

        let (model, summary) = match self.solver.method {
            SolverMethod::LeastSquares => fit_least_squares(&design, y)?,
            SolverMethod::GradientDescent => {
                let dataset = InMemoryDataset::from_tensors(&design, y)?;
                let (model, summary) = self
                    .solver()
                    .fit(LinearRegression::new(features.n_features_out()), &dataset)?;
                if !summary.converged {
                    return Err(FareError::Solver(format!(
                        "gradient descent did not converge within {} epochs (loss {})",
                        summary.epochs, summary.final_loss
                    )));
                }
                (model, summary)
            }
        };

        Ok(FittedFarePipeline {
            features,
            model,
            summary,
        })
    }
}

/// Fitted feature pipeline and linear weights. Immutable; refit to change.
#[derive(Clone)]
pub struct FittedFarePipeline<B: Backend> {
    features: FittedFeaturePipeline<B>,
    model: LinearModel<B, Fitted>,
    summary: FitSummary,
}

impl<B: Backend> FittedFarePipeline<B> {
    pub fn features(&self) -> &FittedFeaturePipeline<B> {
        &self.features
    }

    pub fn model(&self) -> &LinearModel<B, Fitted> {
        &self.model
    }

    pub fn summary(&self) -> &FitSummary {
        &self.summary
    }

    /// Design matrix for `x` under the fitted feature pipeline.
    pub fn transform(&self, x: &RideFrame) -> Result<Tensor2D<B>> {
        Ok(self.features.transform(x)?)
    }

    /// Predicted fares, one per row of `x`.
    pub fn predict(&self, x: &RideFrame) -> Result<Vec<f64>> {
        let design = self.transform(x)?;
        let (_, cols) = design.shape();
        if cols != self.model.n_features() {
            return Err(FareError::ShapeMismatch {
                context: "design columns vs model weights",
                left: cols,
                right: self.model.n_features(),
            });
        }
        Ok(self.model.predict_batch(&design).to_vec())
    }
}
