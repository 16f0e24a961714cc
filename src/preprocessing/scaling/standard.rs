//! Standard Scaler (Z-score normalization).
//!
//! The standard score of a sample `x` is calculated as:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the mean of the training samples and `s` their population
//! standard deviation. A constant column (`s == 0`) is divided by 1 instead.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use std::marker::PhantomData;
use tracing::debug;

/// Configuration for StandardScaler.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardScalerConfig {
    /// Center the data before scaling.
    pub with_mean: bool,
    /// Scale the data to unit variance.
    pub with_std: bool,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug)]
pub struct StandardScaler<B: Backend> {
    config: StandardScalerConfig,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for StandardScaler<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> StandardScaler<B> {
    /// Create a new StandardScaler with default configuration.
    pub fn new() -> Self {
        Self {
            config: StandardScalerConfig::default(),
            _backend: PhantomData,
        }
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }
}

impl<B: Backend> Transformer<B> for StandardScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Fitted = FittedStandardScaler<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let (rows, cols) = data.shape();

        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit StandardScaler on empty data".to_string(),
            ));
        }

        let mean = if self.config.with_mean {
            data.col_mean()
        } else {
            Tensor1D::zeros(cols)
        };

        let std = if self.config.with_std {
            // population std (ddof=0); constant features keep their scale
            let raw = data.col_std(0).to_vec();
            Tensor1D::new(
                raw.into_iter()
                    .map(|s| if s == 0.0 { 1.0 } else { s })
                    .collect(),
            )
        } else {
            Tensor1D::new(vec![1.0; cols])
        };

        debug!(rows, cols, mean = ?mean.to_vec(), std = ?std.to_vec(), "fitted StandardScaler");

        Ok(FittedStandardScaler {
            config: self.config.clone(),
            mean,
            std,
            n_features: cols,
        })
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone)]
pub struct FittedStandardScaler<B: Backend> {
    config: StandardScalerConfig,
    mean: Tensor1D<B>,
    std: Tensor1D<B>,
    n_features: usize,
}

impl<B: Backend> FittedStandardScaler<B> {
    /// Get the mean values for each feature.
    pub fn mean(&self) -> &Tensor1D<B> {
        &self.mean
    }

    /// Get the standard deviation values for each feature (zeros replaced by 1).
    pub fn std(&self) -> &Tensor1D<B> {
        &self.std
    }
}

impl<B: Backend> FittedTransformer<B> for FittedStandardScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let (_, cols) = data.shape();

        if cols != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: cols,
            });
        }

        let mut result = data.clone();

        if self.config.with_mean {
            result = result.sub_row_vector(&self.mean);
        }

        if self.config.with_std {
            result = result.div_row_vector(&self.std);
        }

        Ok(result)
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }

    fn n_features_out(&self) -> usize {
        self.n_features
    }
}
