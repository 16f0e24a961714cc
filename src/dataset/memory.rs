use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::dataset::Dataset;
use crate::error::FareError;
use std::ops::Range;

/// Design matrix and target held on the host, row-major.
///
/// Batches are materialised on the requested backend by [`Dataset::get_batch`].
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    x: Vec<f64>,
    y: Vec<f64>,
    n_features: usize,
}

impl InMemoryDataset {
    pub fn new(x: Vec<Vec<f64>>, y: Vec<f64>) -> Result<Self, FareError> {
        if x.len() != y.len() {
            return Err(FareError::ShapeMismatch {
                context: "feature rows vs target length",
                left: x.len(),
                right: y.len(),
            });
        }
        let n_features = x.first().map_or(0, Vec::len);
        if !x.iter().all(|row| row.len() == n_features) {
            return Err(FareError::Data(
                "All rows must have the same number of features".into(),
            ));
        }
        Self::from_parts(x.into_iter().flatten().collect(), y, n_features)
    }

    /// Copies a feature matrix and target out of backend tensors.
    pub fn from_tensors<B: Backend>(x: &Tensor2D<B>, y: &[f64]) -> Result<Self, FareError> {
        let (rows, cols) = x.shape();
        if rows != y.len() {
            return Err(FareError::ShapeMismatch {
                context: "feature rows vs target length",
                left: rows,
                right: y.len(),
            });
        }
        Self::from_parts(x.to_vec(), y.to_vec(), cols)
    }

    fn from_parts(x: Vec<f64>, y: Vec<f64>, n_features: usize) -> Result<Self, FareError> {
        if y.is_empty() {
            return Err(FareError::Data("Dataset is empty".into()));
        }
        if let Some(i) = y.iter().position(|v| !v.is_finite()) {
            return Err(FareError::Data(format!("target at row {i} is not finite")));
        }
        Ok(Self { x, y, n_features })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

impl Dataset for InMemoryDataset {
    type Error = std::convert::Infallible;
    type Item = (Vec<f64>, f64);

    fn len(&self) -> Option<usize> {
        Some(self.y.len())
    }

    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
        let batch_x = self.x[range.start * self.n_features..range.end * self.n_features].to_vec();
        let batch_y = self.y[range.clone()].to_vec();

        Ok((
            Tensor2D::<B>::new(batch_x, range.len(), self.n_features),
            Tensor1D::<B>::new(batch_y),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_in_memory_dataset_batches() {
        let ds = InMemoryDataset::new(
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
            vec![10.0, 20.0, 30.0],
        )
        .unwrap();
        assert_eq!(ds.len(), Some(3));
        assert_eq!(ds.n_features(), 2);

        let (x, y) = ds.get_batch::<CpuBackend>(1..3).unwrap();
        assert_eq!(x.shape(), (2, 2));
        assert_eq!(x.to_vec(), vec![3.0, 4.0, 5.0, 6.0]);
        assert_eq!(y.to_vec(), vec![20.0, 30.0]);
    }

    #[test]
    fn test_in_memory_dataset_from_tensors() {
        let x = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0], 2, 1);
        let ds = InMemoryDataset::from_tensors(&x, &[3.0, 4.0]).unwrap();
        assert_eq!(ds.n_features(), 1);
        assert!(InMemoryDataset::from_tensors(&x, &[3.0]).is_err());
    }

    #[test]
    fn test_in_memory_dataset_validation() {
        assert!(InMemoryDataset::new(vec![vec![1.0]], vec![1.0, 2.0]).is_err());
        assert!(InMemoryDataset::new(vec![vec![1.0], vec![1.0, 2.0]], vec![1.0, 2.0]).is_err());
        assert!(InMemoryDataset::new(vec![], vec![]).is_err());
        assert!(matches!(
            InMemoryDataset::new(vec![vec![1.0]], vec![f64::NAN]),
            Err(FareError::Data(_))
        ));
    }
}
