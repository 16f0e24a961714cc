//! One-hot encoding for categorical features.

use crate::backend::{Backend, Tensor2D};
use crate::preprocessing::encoding::HandleUnknown;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use std::collections::BTreeSet;
use std::marker::PhantomData;
use tracing::debug;

/// One-hot encoder for categorical features.
///
/// Each input column is a categorical feature; the encoder learns the sorted
/// distinct values of each column during fitting.
///
/// # Example
/// ```
/// use taxifare::backend::{CpuBackend, Tensor2D};
/// use taxifare::preprocessing::{FittedTransformer, HandleUnknown, OneHotEncoder, Transformer};
///
/// let train = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 2.0], 3, 1);
/// let fitted = OneHotEncoder::<CpuBackend>::new()
///     .with_handle_unknown(HandleUnknown::Ignore)
///     .fit(&train)
///     .unwrap();
///
/// let unseen = Tensor2D::<CpuBackend>::new(vec![7.0], 1, 1);
/// assert_eq!(fitted.transform(&unseen).unwrap().to_vec(), vec![0.0, 0.0, 0.0]);
/// ```
#[derive(Clone, Debug)]
pub struct OneHotEncoder<B: Backend> {
    handle_unknown: HandleUnknown,
    _backend: PhantomData<B>,
}

impl<B: Backend> OneHotEncoder<B> {
    /// Create a new OneHotEncoder that rejects unknown categories.
    pub fn new() -> Self {
        Self {
            handle_unknown: HandleUnknown::default(),
            _backend: PhantomData,
        }
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }
}

impl<B: Backend> Default for OneHotEncoder<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder<B: Backend> {
    /// Sorted distinct values for each input column.
    categories: Vec<Vec<i64>>,
    /// Start of each column's block in the output.
    offsets: Vec<usize>,
    n_features_out: usize,
    handle_unknown: HandleUnknown,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedOneHotEncoder<B> {
    /// Get the categories learned for each feature.
    pub fn categories(&self) -> &[Vec<i64>] {
        &self.categories
    }

    /// Get the number of categories per input feature.
    pub fn n_values(&self) -> Vec<usize> {
        self.categories.iter().map(Vec::len).collect()
    }
}

/// Reads a cell as a category code.
fn category(value: f64, row: usize, col: usize) -> Result<i64, PreprocessingError> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(PreprocessingError::InvalidParameter(format!(
            "OneHotEncoder expects non-negative integer values, got {value} at ({row}, {col})"
        )));
    }
    Ok(value as i64)
}

impl<B: Backend> Transformer<B> for OneHotEncoder<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Fitted = FittedOneHotEncoder<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let (rows, cols) = data.shape();

        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit OneHotEncoder on empty data".to_string(),
            ));
        }

        let mut seen: Vec<BTreeSet<i64>> = vec![BTreeSet::new(); cols];
        for (row, values) in data.to_rows().iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                seen[col].insert(category(value, row, col)?);
            }
        }

        let categories: Vec<Vec<i64>> = seen.into_iter().map(|s| s.into_iter().collect()).collect();
        let mut offsets = Vec::with_capacity(cols);
        let mut n_features_out = 0;
        for cats in &categories {
            offsets.push(n_features_out);
            n_features_out += cats.len();
        }

        debug!(?categories, n_features_out, "fitted OneHotEncoder");

        Ok(FittedOneHotEncoder {
            categories,
            offsets,
            n_features_out,
            handle_unknown: self.handle_unknown,
            _backend: PhantomData,
        })
    }
}

impl<B: Backend> FittedTransformer<B> for FittedOneHotEncoder<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let (rows, cols) = data.shape();

        if cols != self.categories.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.categories.len(),
                got_features: cols,
            });
        }

        let mut result = vec![0.0f64; rows * self.n_features_out];

        for (row, values) in data.to_rows().iter().enumerate() {
            let out = &mut result[row * self.n_features_out..(row + 1) * self.n_features_out];
            for (col, &value) in values.iter().enumerate() {
                let code = category(value, row, col)?;
                match self.categories[col].binary_search(&code) {
                    Ok(idx) => out[self.offsets[col] + idx] = 1.0,
                    Err(_) if self.handle_unknown == HandleUnknown::Ignore => {}
                    Err(_) => {
                        return Err(PreprocessingError::UnknownCategory {
                            feature: col,
                            value: code,
                        })
                    }
                }
            }
        }

        Ok(Tensor2D::new(result, rows, self.n_features_out))
    }

    fn n_features_in(&self) -> usize {
        self.categories.len()
    }

    fn n_features_out(&self) -> usize {
        self.n_features_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_one_hot_encoder_single_column() {
        // Input: [[0], [1], [2]]
        let data = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 2.0], 3, 1);

        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();

        assert_eq!(fitted.n_features_in(), 1);
        assert_eq!(fitted.n_features_out(), 3);
        assert_eq!(fitted.categories()[0], vec![0, 1, 2]);

        let transformed = fitted.transform(&data).unwrap();
        assert_eq!(
            transformed.to_rows(),
            vec![
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0]
            ]
        );
    }

    #[test]
    fn test_one_hot_encoder_blocks_follow_column_order() {
        // hour-like column then year-like column
        let data = Tensor2D::<CpuBackend>::new(vec![19.0, 2013.0, 7.0, 2014.0, 19.0, 2014.0], 3, 2);

        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();
        assert_eq!(fitted.n_values(), vec![2, 2]);
        assert_eq!(fitted.categories()[0], vec![7, 19]);

        let rows = fitted.transform(&data).unwrap().to_rows();
        assert_eq!(rows[0], vec![0.0, 1.0, 1.0, 0.0]);
        assert_eq!(rows[1], vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_one_hot_encoder_unknown_error() {
        let train = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0], 2, 1);
        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&train).unwrap();

        let test = Tensor2D::<CpuBackend>::new(vec![5.0], 1, 1);
        assert!(matches!(
            fitted.transform(&test),
            Err(PreprocessingError::UnknownCategory {
                feature: 0,
                value: 5
            })
        ));
    }

    #[test]
    fn test_one_hot_encoder_unknown_ignore_only_zeroes_its_block() {
        let train = Tensor2D::<CpuBackend>::new(vec![0.0, 10.0, 1.0, 11.0], 2, 2);
        let fitted = OneHotEncoder::<CpuBackend>::new()
            .with_handle_unknown(HandleUnknown::Ignore)
            .fit(&train)
            .unwrap();

        let test = Tensor2D::<CpuBackend>::new(vec![3.0, 11.0], 1, 2);
        assert_eq!(
            fitted.transform(&test).unwrap().to_vec(),
            vec![0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_one_hot_encoder_rejects_non_integer() {
        let data = Tensor2D::<CpuBackend>::new(vec![0.5], 1, 1);
        assert!(matches!(
            OneHotEncoder::<CpuBackend>::new().fit(&data),
            Err(PreprocessingError::InvalidParameter(_))
        ));

        let data = Tensor2D::<CpuBackend>::new(vec![-1.0], 1, 1);
        assert!(OneHotEncoder::<CpuBackend>::new().fit(&data).is_err());
    }

    #[test]
    fn test_one_hot_encoder_empty() {
        let data = Tensor2D::<CpuBackend>::zeros(0, 1);
        assert!(matches!(
            OneHotEncoder::<CpuBackend>::new().fit(&data),
            Err(PreprocessingError::EmptyData(_))
        ));
    }
}
