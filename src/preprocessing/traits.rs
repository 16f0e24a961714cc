//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: the configurable, unfitted state. `fit` consumes training
//!   data and returns the fitted type.
//! - [`FittedTransformer`]: learned parameters, ready for inference.
//!
//! Only the fitted type exposes `transform`, so transforming with an unfitted
//! transformer does not compile.

use crate::backend::Backend;
use crate::preprocessing::error::PreprocessingError;

/// Trait for unfitted transformers with hyperparameters.
///
/// # Type Parameters
/// - `B`: The backend used for computation.
/// - `Input`: Input data type (a [`RideFrame`](crate::dataset::RideFrame) or a
///   `Tensor2D<B>`).
/// - `Output`: Output data type (typically `Tensor2D<B>`).
/// - `Fitted`: The corresponding fitted transformer type.
///
/// # Example
/// ```
/// use taxifare::backend::{CpuBackend, Tensor2D};
/// use taxifare::preprocessing::{FittedTransformer, StandardScaler, Transformer};
///
/// let train = Tensor2D::<CpuBackend>::new(vec![1.0, 3.0], 2, 1);
/// let fitted = StandardScaler::<CpuBackend>::new().fit(&train).unwrap();
/// assert_eq!(fitted.transform(&train).unwrap().to_vec(), vec![-1.0, 1.0]);
/// ```
pub trait Transformer<B: Backend>: Clone {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<B, Input = Self::Input, Output = Self::Output>;

    /// Fit the transformer to the training data.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the data is empty, holds invalid
    /// values, or has an incompatible shape.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit the transformer and transform the same data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.fit(data)?.transform(data)
    }
}

/// Trait for fitted transformers ready for inference.
pub trait FittedTransformer<B: Backend>: Clone {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the input does not match what was seen
    /// during fit, or holds invalid values.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;

    /// Returns the number of features (columns) seen during fit.
    fn n_features_in(&self) -> usize;

    /// Returns the number of output columns `transform` produces.
    fn n_features_out(&self) -> usize;
}

/// Marker trait for transformers that learn nothing from data.
///
/// For these, `fit` only validates configuration and the fitted type applies
/// the same row-wise function to any input.
pub trait StatelessTransformer<B: Backend>: Transformer<B> {
    /// Transform data without a fitting step.
    fn transform_direct(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;
}
