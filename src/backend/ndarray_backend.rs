use super::{hcat_shape, Backend};
use crate::preprocessing::PreprocessingError;
use ndarray::{concatenate, s, Array1, Array2, ArrayView2, Axis};
use std::ops::Range;

/// Tensor backend using the `ndarray` crate.
///
/// # Type mappings
/// - `Scalar`: `f64`
/// - `Tensor1D`: `ndarray::Array1<f64>`
/// - `Tensor2D`: `ndarray::Array2<f64>` (standard row-major layout)
///
/// # Example
/// ```
/// use taxifare::backend::{NdarrayBackend, Tensor1D, Tensor2D};
///
/// let a: Tensor2D<NdarrayBackend> = Tensor2D::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
/// let x: Tensor1D<NdarrayBackend> = Tensor1D::new(vec![1.0, 2.0]);
/// assert_eq!(a.dot(&x).to_vec(), vec![5.0, 11.0]);
/// ```
#[derive(Clone, Debug, Copy)]
pub struct NdarrayBackend;

impl Backend for NdarrayBackend {
    type Scalar = f64;
    type Tensor1D = Array1<f64>;
    type Tensor2D = Array2<f64>;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        Array1::zeros(len)
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        Array2::zeros((rows, cols))
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        Array1::from_vec(data)
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Array2::from_shape_fn((rows, cols), |(i, j)| data[i * cols + j])
    }

    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a + b
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a - b
    }

    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t * *s
    }

    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t + *s
    }

    fn dot_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Scalar {
        a.dot(b)
    }

    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.sum()
    }

    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.mean().unwrap_or(f64::NAN)
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.to_vec()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.iter().copied().collect()
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        t.dim()
    }

    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        a.dot(x)
    }

    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        a.t().dot(x)
    }

    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::from_elem(t.ncols(), f64::NAN))
    }

    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D {
        if t.nrows() <= ddof {
            return Array1::zeros(t.ncols());
        }
        t.std_axis(Axis(0), ddof as f64)
    }

    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t - &v.view().insert_axis(Axis(0))
    }

    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t / &v.view().insert_axis(Axis(0))
    }

    fn hcat_2d(tensors: &[Self::Tensor2D]) -> Result<Self::Tensor2D, PreprocessingError> {
        let shapes: Vec<(usize, usize)> = tensors.iter().map(Array2::dim).collect();
        hcat_shape(&shapes)?;

        let views: Vec<ArrayView2<'_, f64>> = tensors.iter().map(Array2::view).collect();
        concatenate(Axis(1), &views).map_err(|e| PreprocessingError::InvalidShape {
            expected: "tensors with a common row count".to_string(),
            got: e.to_string(),
        })
    }

    fn slice_rows_2d(t: &Self::Tensor2D, rows: Range<usize>) -> Self::Tensor2D {
        assert!(rows.end <= t.nrows(), "Row range out of bounds");
        t.slice(s![rows, ..]).to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, Tensor1D, Tensor2D};

    #[test]
    fn test_column_stats_match_cpu_backend() {
        let values = vec![1.0, 10.0, 2.0, 20.0, 6.0, 30.0];
        let nd = Tensor2D::<NdarrayBackend>::new(values.clone(), 3, 2);
        let cpu = Tensor2D::<CpuBackend>::new(values, 3, 2);

        assert_eq!(nd.col_mean().to_vec(), cpu.col_mean().to_vec());
        for (a, b) in nd.col_std(0).to_vec().iter().zip(cpu.col_std(0).to_vec()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_hcat_and_slice() {
        let a = Tensor2D::<NdarrayBackend>::new(vec![1.0, 2.0], 2, 1);
        let b = Tensor2D::<NdarrayBackend>::new(vec![3.0, 4.0], 2, 1);
        let c = Tensor2D::hcat(&[a, b]).unwrap();
        assert_eq!(c.to_vec(), vec![1.0, 3.0, 2.0, 4.0]);
        assert_eq!(c.slice_rows(1..2).to_vec(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_gradient_ops() {
        let a = Tensor2D::<NdarrayBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let r = Tensor1D::<NdarrayBackend>::new(vec![1.0, -1.0]);
        assert_eq!(a.tdot(&r).to_vec(), vec![-2.0, -2.0]);
        assert!(Tensor1D::<NdarrayBackend>::zeros(0).mean().to_f64().is_nan());
    }
}
