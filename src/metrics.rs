//! Regression metrics over host slices.
//!
//! All functions take `(predictions, actuals)`, reject unequal lengths with
//! [`FareError::ShapeMismatch`] and empty inputs with [`FareError::Data`].

use crate::error::{FareError, Result};

fn paired<'a>(
    predictions: &'a [f64],
    actuals: &'a [f64],
) -> Result<impl Iterator<Item = f64> + 'a> {
    if predictions.len() != actuals.len() {
        return Err(FareError::ShapeMismatch {
            context: "predictions vs actuals",
            left: predictions.len(),
            right: actuals.len(),
        });
    }
    if predictions.is_empty() {
        return Err(FareError::Data("cannot score an empty prediction set".into()));
    }
    Ok(predictions.iter().zip(actuals).map(|(p, a)| p - a))
}

/// Mean squared error: `mean((p - a)²)`.
pub fn mse(predictions: &[f64], actuals: &[f64]) -> Result<f64> {
    let sum: f64 = paired(predictions, actuals)?.map(|d| d * d).sum();
    Ok(sum / predictions.len() as f64)
}

/// Root mean squared error, in the units of the target.
///
/// ```
/// use taxifare::metrics::compute_rmse;
///
/// assert_eq!(compute_rmse(&[3.0, 5.0], &[3.0, 5.0]).unwrap(), 0.0);
/// assert_eq!(compute_rmse(&[1.0, 1.0], &[4.0, -2.0]).unwrap(), 3.0);
/// assert!(compute_rmse(&[1.0], &[1.0, 2.0]).is_err());
/// ```
pub fn compute_rmse(predictions: &[f64], actuals: &[f64]) -> Result<f64> {
    mse(predictions, actuals).map(f64::sqrt)
}

/// Mean absolute error: `mean(|p - a|)`.
pub fn mae(predictions: &[f64], actuals: &[f64]) -> Result<f64> {
    let sum: f64 = paired(predictions, actuals)?.map(f64::abs).sum();
    Ok(sum / predictions.len() as f64)
}
