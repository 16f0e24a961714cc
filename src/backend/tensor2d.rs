use super::scalar::Scalar;
use super::tensor1d::Tensor1D;
use crate::backend::Backend;
use crate::preprocessing::PreprocessingError;
use std::marker::PhantomData;
use std::ops::Range;

/// Backend-typed, row-major 2D tensor (samples × features).
#[derive(Clone)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor2D<B> {
    /// Creates a tensor from row-major host values.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        Self::from_raw(B::from_vec_2d(data, rows, cols))
    }

    pub(crate) fn from_raw(data: B::Tensor2D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Creates a single-column tensor from one value per row.
    pub fn from_column(column: Vec<f64>) -> Self {
        let rows = column.len();
        Self::new(column, rows, 1)
    }

    /// Creates a zero-filled tensor.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_raw(B::zeros_2d(rows, cols))
    }

    /// Matrix-vector product `self @ other`.
    pub fn dot(&self, other: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::from_raw(B::matvec(&self.data, &other.data))
    }

    /// Transposed matrix-vector product `self^T @ other`.
    pub fn tdot(&self, other: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::from_raw(B::matvec_transposed(&self.data, &other.data))
    }

    /// Per-column mean.
    pub fn col_mean(&self) -> Tensor1D<B> {
        Tensor1D::from_raw(B::col_mean_2d(&self.data))
    }

    /// Per-column standard deviation with `ddof` delta degrees of freedom.
    pub fn col_std(&self, ddof: usize) -> Tensor1D<B> {
        Tensor1D::from_raw(B::col_std_2d(&self.data, ddof))
    }

    /// Subtracts `v[j]` from every element of column `j`.
    pub fn sub_row_vector(&self, v: &Tensor1D<B>) -> Self {
        Self::from_raw(B::broadcast_sub_1d_to_2d_rows(&self.data, &v.data))
    }

    /// Divides every element of column `j` by `v[j]`.
    pub fn div_row_vector(&self, v: &Tensor1D<B>) -> Self {
        Self::from_raw(B::broadcast_div_1d_to_2d_rows(&self.data, &v.data))
    }

    /// Concatenates tensors column-wise, in slice order.
    pub fn hcat(tensors: &[Self]) -> Result<Self, PreprocessingError> {
        let raw: Vec<B::Tensor2D> = tensors.iter().map(|t| t.data.clone()).collect();
        B::hcat_2d(&raw).map(Self::from_raw)
    }

    /// Copies a contiguous block of rows.
    pub fn slice_rows(&self, rows: Range<usize>) -> Self {
        Self::from_raw(B::slice_rows_2d(&self.data, rows))
    }

    /// Number of rows as a backend scalar (used to average losses).
    pub fn n_rows_scalar(&self) -> Scalar<B> {
        Scalar::new(self.shape().0 as f64)
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        B::shape(&self.data)
    }

    /// Copies the values out to the host in row-major order.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_2d(&self.data)
    }

    /// Copies the values out as one `Vec` per row.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        let (_, cols) = self.shape();
        if cols == 0 {
            return vec![Vec::new(); self.shape().0];
        }
        self.to_vec().chunks(cols).map(<[f64]>::to_vec).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_tensor2d_matvec_ops() {
        // A = [[1, 2],
        //      [3, 4]]
        let a = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let x = Tensor1D::<CpuBackend>::new(vec![1.0, 0.0]);

        assert_eq!(a.dot(&x).to_vec(), vec![1.0, 3.0]);
        assert_eq!(a.tdot(&x).to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_tensor2d_column_stats() {
        let a = Tensor2D::<CpuBackend>::new(vec![1.0, 10.0, 3.0, 10.0], 2, 2);

        assert_eq!(a.col_mean().to_vec(), vec![2.0, 10.0]);
        assert_eq!(a.col_std(0).to_vec(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_tensor2d_hcat_preserves_order() {
        let a = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0], 2, 1);
        let b = Tensor2D::<CpuBackend>::new(vec![3.0, 4.0, 5.0, 6.0], 2, 2);

        let c = Tensor2D::hcat(&[a, b]).unwrap();
        assert_eq!(c.shape(), (2, 3));
        assert_eq!(c.to_rows(), vec![vec![1.0, 3.0, 4.0], vec![2.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_tensor2d_hcat_row_mismatch() {
        let a = Tensor2D::<CpuBackend>::zeros(2, 1);
        let b = Tensor2D::<CpuBackend>::zeros(3, 1);
        assert!(Tensor2D::hcat(&[a, b]).is_err());
    }

    #[test]
    fn test_tensor2d_slice_rows() {
        let a = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
        let s = a.slice_rows(1..3);
        assert_eq!(s.shape(), (2, 2));
        assert_eq!(s.to_vec(), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_tensor2d_shape() {
        let t = Tensor2D::<CpuBackend>::from_column(vec![1.0, 2.0, 3.0]);
        assert_eq!(t.shape(), (3, 1));

        let t2 = Tensor2D::<CpuBackend>::zeros(0, 5);
        assert_eq!(t2.shape(), (0, 5));
        assert!(t2.to_rows().is_empty());
    }
}
