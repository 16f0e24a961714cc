//! Seeded train/validation split of a ride frame.

use super::frame::RideFrame;
use crate::error::{FareError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// A train / validation partition of a frame and its target.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub x_train: RideFrame,
    pub x_test: RideFrame,
    pub y_train: Vec<f64>,
    pub y_test: Vec<f64>,
}

/// Shuffles rows with a seeded RNG and holds out `ceil(n * test_fraction)` of
/// them for validation.
///
/// Both parts are guaranteed non-empty, so at least two rows are required.
pub fn train_test_split(
    x: &RideFrame,
    y: &[f64],
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    let n = x.n_rows();
    if n != y.len() {
        return Err(FareError::ShapeMismatch {
            context: "feature rows vs target length",
            left: n,
            right: y.len(),
        });
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(FareError::Config(format!(
            "test_fraction must be in (0, 1), got {test_fraction}"
        )));
    }
    if n < 2 {
        return Err(FareError::Data(format!(
            "need at least 2 rows to split, got {n}"
        )));
    }

    let n_test = ((n as f64 * test_fraction).ceil() as usize).clamp(1, n - 1);

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let (test_idx, train_idx) = indices.split_at(n_test);

    debug!(n_train = train_idx.len(), n_test, seed, "split rows");

    Ok(TrainTestSplit {
        x_train: x.select_rows(train_idx),
        x_test: x.select_rows(test_idx),
        y_train: train_idx.iter().map(|&i| y[i]).collect(),
        y_test: test_idx.iter().map(|&i| y[i]).collect(),
    })
}
