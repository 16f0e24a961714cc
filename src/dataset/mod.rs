//! Ride data: loading, cleaning, the column-oriented frame, splitting, and the
//! batched [`Dataset`] view the solver trains on.
//!
//! # Core Concepts
//!
//! - **RideRecord**: one CSV row, every field optional.
//! - **RideFrame**: named columns; what the feature pipeline consumes.
//! - **Dataset**: a source of `(X, y)` batches where `X` is the assembled
//!   design matrix `(n_samples, n_features)` and `y` the fares `(n_samples,)`.
//!
//! # Example
//!
//! ```rust
//! use taxifare::dataset::{Dataset, InMemoryDataset};
//! use taxifare::backend::CpuBackend;
//!
//! let x = vec![vec![1.0], vec![2.0]];
//! let y = vec![0.0, 1.0];
//! let dataset = InMemoryDataset::new(x, y).unwrap();
//!
//! for batch in dataset.batches::<CpuBackend>(1) {
//!     let (x_batch, y_batch) = batch.unwrap();
//!     assert_eq!(x_batch.shape().0, y_batch.len());
//! }
//! ```

use crate::backend::{Backend, Tensor1D, Tensor2D};
use std::{fmt::Debug, ops::Range};

pub mod frame;
pub mod memory;
pub mod record;
pub mod source;
pub mod split;

pub use self::frame::{Column, RideFrame};
pub use self::memory::InMemoryDataset;
pub use self::record::{columns, RideRecord};
pub use self::source::{clean_data, ensure_non_empty, get_data, read_records};
pub use self::split::{train_test_split, TrainTestSplit};

/// Abstract interface for a training set in `(X, y)` form.
pub trait Dataset {
    /// Error type returned when accessing data.
    type Error: Debug + 'static;

    /// Type of a single dataset item (typically unused directly).
    type Item: ?Sized;

    /// Returns the total number of samples, if known.
    fn len(&self) -> Option<usize>;

    /// Checks whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Creates an iterator over fixed-size batches (the last may be smaller).
    ///
    /// `batch_size` must be positive.
    fn batches<B: Backend>(&self, batch_size: usize) -> DatasetBatchIter<'_, B, Self>
    where
        Self: Sized,
    {
        DatasetBatchIter {
            dataset: self,
            batch_size,
            current: 0,
            _backend: std::marker::PhantomData,
        }
    }

    /// Loads the samples in `range` as backend tensors.
    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error>;
}

/// Iterator over dataset batches, created by [`Dataset::batches`].
pub struct DatasetBatchIter<'a, B: Backend, D: ?Sized> {
    dataset: &'a D,
    batch_size: usize,
    /// Index of the next sample to yield.
    current: usize,
    _backend: std::marker::PhantomData<B>,
}

impl<B: Backend, D: Dataset> Iterator for DatasetBatchIter<'_, B, D> {
    type Item = Result<(Tensor2D<B>, Tensor1D<B>), D::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.dataset.len()?;
        if self.current >= total || self.batch_size == 0 {
            return None;
        }

        let end = (self.current + self.batch_size).min(total);
        let range = self.current..end;
        self.current = end;

        Some(self.dataset.get_batch::<B>(range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    struct MockDataset {
        len: usize,
    }

    impl Dataset for MockDataset {
        type Error = &'static str;
        type Item = ();

        fn len(&self) -> Option<usize> {
            Some(self.len)
        }

        fn get_batch<B: Backend>(
            &self,
            range: Range<usize>,
        ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
            if range.end > self.len {
                return Err("range out of bounds");
            }
            let n = range.len();
            let x: Vec<f64> = (0..n * 2).map(|i| (range.start * 2 + i) as f64).collect();
            let y: Vec<f64> = range.map(|i| i as f64).collect();
            Ok((Tensor2D::new(x, n, 2), Tensor1D::new(y)))
        }
    }

    #[test]
    fn test_dataset_is_empty() {
        assert!(MockDataset { len: 0 }.is_empty());
        assert!(!MockDataset { len: 1 }.is_empty());
    }

    #[test]
    fn test_batches_full() {
        let dataset = MockDataset { len: 6 };
        let mut iter = dataset.batches::<CpuBackend>(2);

        for i in 0..3 {
            let (x, y) = iter.next().unwrap().unwrap();
            assert_eq!(x.shape(), (2, 2));
            assert_eq!(y.to_vec(), vec![i as f64 * 2.0, i as f64 * 2.0 + 1.0]);
        }
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_batches_partial_last() {
        let dataset = MockDataset { len: 5 };
        let shapes: Vec<_> = dataset
            .batches::<CpuBackend>(2)
            .map(|b| b.unwrap().0.shape())
            .collect();
        assert_eq!(shapes, vec![(2, 2), (2, 2), (1, 2)]);
    }

    #[test]
    fn test_batches_larger_than_dataset() {
        let dataset = MockDataset { len: 3 };
        let mut iter = dataset.batches::<CpuBackend>(10);
        assert_eq!(iter.next().unwrap().unwrap().0.shape(), (3, 2));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_batches_empty_and_zero_size() {
        assert!(MockDataset { len: 0 }
            .batches::<CpuBackend>(2)
            .next()
            .is_none());
        assert!(MockDataset { len: 4 }
            .batches::<CpuBackend>(0)
            .next()
            .is_none());
    }
}
