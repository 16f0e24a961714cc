//! Holds a training set and the fare pipeline fitted on it.
//!
//! ```no_run
//! use taxifare::config::TrainConfig;
//! use taxifare::dataset::{columns, get_data, clean_data, train_test_split, RideFrame};
//! use taxifare::trainer::Trainer;
//!
//! # fn main() -> taxifare::error::Result<()> {
//! let config = TrainConfig::default();
//! let records = clean_data(get_data(&config.source, config.row_limit)?);
//! let (x, y) = RideFrame::from_records(&records).split_target(columns::FARE_AMOUNT)?;
//! let split = train_test_split(&x, &y, config.test_fraction, config.seed)?;
//!
//! let mut trainer: Trainer = Trainer::new(split.x_train, split.y_train, config)?;
//! trainer.run()?;
//! println!("RMSE = {}", trainer.evaluate(&split.x_test, &split.y_test)?);
//! # Ok(())
//! # }
//! ```

use crate::backend::{Backend, CpuBackend};
use crate::config::TrainConfig;
use crate::dataset::RideFrame;
use crate::error::{FareError, Result};
use crate::metrics::compute_rmse;
use crate::pipeline::{FarePipeline, FittedFarePipeline};
use crate::solver::FitSummary;
use chrono_tz::Tz;
use tracing::info;

/// Owns `(x, y)` and the pipeline; `run` fits, `evaluate` scores.
///
/// The unfitted pipeline is built by [`Trainer::new`] and rebuilt by
/// [`Trainer::set_pipeline`]. Operations that need a fitted pipeline return
/// [`FareError::NotFitted`] until [`Trainer::run`] succeeds.
pub struct Trainer<B: Backend = CpuBackend> {
    x: RideFrame,
    y: Vec<f64>,
    config: TrainConfig,
    timezone: Tz,
    pipeline: FarePipeline<B>,
    fitted: Option<FittedFarePipeline<B>>,
}

impl<B: Backend> Trainer<B> {
    /// # Errors
    /// [`FareError::ShapeMismatch`] when `x` and `y` disagree in length, or
    /// [`FareError::Config`] for an invalid `config`.
    pub fn new(x: RideFrame, y: Vec<f64>, config: TrainConfig) -> Result<Self> {
        if x.n_rows() != y.len() {
            return Err(FareError::ShapeMismatch {
                context: "feature rows vs target length",
                left: x.n_rows(),
                right: y.len(),
            });
        }
        config.validate()?;
        let timezone = config.tz()?;

        Ok(Self {
            pipeline: FarePipeline::new(timezone, config.solver.clone()),
            x,
            y,
            config,
            timezone,
            fitted: None,
        })
    }

    /// Rebuilds the unfitted pipeline and discards any fitted state.
    pub fn set_pipeline(&mut self) {
        self.pipeline = FarePipeline::new(self.timezone, self.config.solver.clone());
        self.fitted = None;
    }

    /// Fits the pipeline on the held training data.
    ///
    /// On error the previous fitted state, if any, is cleared.
    pub fn run(&mut self) -> Result<FitSummary> {
        self.fitted = None;
        let fitted = self.pipeline.fit(&self.x, &self.y)?;
        let summary = *fitted.summary();
        info!(
            rows = self.x.n_rows(),
            epochs = summary.epochs,
            train_mse = summary.final_loss,
            "trainer run complete"
        );
        self.fitted = Some(fitted);
        Ok(summary)
    }

    pub fn predict(&self, x: &RideFrame) -> Result<Vec<f64>> {
        self.require_fitted("predict")?.predict(x)
    }

    /// RMSE of the fitted pipeline on `(x_test, y_test)`.
    pub fn evaluate(&self, x_test: &RideFrame, y_test: &[f64]) -> Result<f64> {
        let fitted = self.require_fitted("evaluate")?;
        if x_test.n_rows() != y_test.len() {
            return Err(FareError::ShapeMismatch {
                context: "feature rows vs target length",
                left: x_test.n_rows(),
                right: y_test.len(),
            });
        }
        let rmse = compute_rmse(&fitted.predict(x_test)?, y_test)?;
        info!(rows = y_test.len(), rmse, "evaluated");
        Ok(rmse)
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn fitted(&self) -> Option<&FittedFarePipeline<B>> {
        self.fitted.as_ref()
    }

    pub fn pipeline(&self) -> &FarePipeline<B> {
        &self.pipeline
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    fn require_fitted(&self, operation: &'static str) -> Result<&FittedFarePipeline<B>> {
        self.fitted.as_ref().ok_or(FareError::NotFitted(operation))
    }
}
