use super::{hcat_shape, Backend};
use crate::preprocessing::PreprocessingError;
use std::ops::Range;

/// Pure-Rust backend over plain `Vec<f64>` storage.
#[derive(Clone, Debug, Copy)]
pub struct CpuBackend;

/// Row-major matrix storage for [`CpuBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTensor2D {
    pub data: Vec<f64>,
    pub rows: usize,
    pub cols: usize,
}

impl CpuTensor2D {
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Self { data, rows, cols }
    }

    fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    fn map_columns(&self, v: &[f64], f: impl Fn(f64, f64) -> f64) -> Self {
        assert_eq!(v.len(), self.cols, "Broadcast length must equal column count");
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(k, x)| f(*x, v[k % self.cols.max(1)]))
            .collect();
        Self::new(data, self.rows, self.cols)
    }
}

impl From<&[Vec<f64>]> for CpuTensor2D {
    fn from(x: &[Vec<f64>]) -> Self {
        if x.is_empty() {
            return CpuTensor2D::new(Vec::new(), 0, 0);
        }
        let rows = x.len();
        let cols = x[0].len();
        assert!(
            x.iter().all(|row| row.len() == cols),
            "All rows must have same length"
        );
        let data: Vec<f64> = x.iter().flat_map(|row| row.iter()).copied().collect();
        CpuTensor2D::new(data, rows, cols)
    }
}

impl Backend for CpuBackend {
    type Scalar = f64;
    type Tensor1D = Vec<f64>;
    type Tensor2D = CpuTensor2D;

    // --- Constructors ---
    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.; len]
    }
    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(vec![0.; rows * cols], rows, cols)
    }
    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        data
    }
    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(data, rows, cols)
    }
    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    // --- Element-wise ops ---
    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a.iter().zip(b.iter()).map(|(a, b)| a + b).collect()
    }
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a.iter().zip(b.iter()).map(|(a, b)| a - b).collect()
    }
    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x * s).collect()
    }
    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x + s).collect()
    }

    // --- Reductions ---
    fn dot_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Scalar {
        a.iter().zip(b.iter()).map(|(a, b)| a * b).sum()
    }
    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>()
    }
    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>() / t.len() as f64
    }

    // --- Access ---
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.clone()
    }
    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }
    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.data.clone()
    }
    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        (t.rows, t.cols)
    }

    // --- Linear algebra ---
    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.cols, x.len(), "matvec: column count must equal vector length");
        (0..a.rows)
            .map(|i| a.row(i).iter().zip(x.iter()).map(|(a, x)| a * x).sum())
            .collect()
    }

    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.rows, x.len(), "matvec_transposed: row count must equal vector length");
        let mut out = vec![0.; a.cols];
        for (i, xi) in x.iter().enumerate() {
            for (o, aij) in out.iter_mut().zip(a.row(i)) {
                *o += aij * xi;
            }
        }
        out
    }

    // --- Column-wise ops ---
    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        let mut sums = vec![0.; t.cols];
        for i in 0..t.rows {
            for (s, x) in sums.iter_mut().zip(t.row(i)) {
                *s += x;
            }
        }
        sums.into_iter().map(|s| s / t.rows as f64).collect()
    }

    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D {
        if t.rows <= ddof {
            return vec![0.; t.cols];
        }
        let means = Self::col_mean_2d(t);
        let mut var_sums = vec![0.; t.cols];
        for i in 0..t.rows {
            for ((v, x), m) in var_sums.iter_mut().zip(t.row(i)).zip(&means) {
                let diff = x - m;
                *v += diff * diff;
            }
        }
        let divisor = (t.rows - ddof) as f64;
        var_sums.into_iter().map(|v| (v / divisor).sqrt()).collect()
    }

    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.map_columns(v, |x, m| x - m)
    }

    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.map_columns(v, |x, s| x / s)
    }

    // --- Row / column manipulation ---
    fn hcat_2d(tensors: &[Self::Tensor2D]) -> Result<Self::Tensor2D, PreprocessingError> {
        let shapes: Vec<(usize, usize)> = tensors.iter().map(Self::shape).collect();
        let (rows, total_cols) = hcat_shape(&shapes)?;

        let mut data = Vec::with_capacity(rows * total_cols);
        for i in 0..rows {
            for t in tensors {
                data.extend_from_slice(t.row(i));
            }
        }
        Ok(CpuTensor2D::new(data, rows, total_cols))
    }

    fn slice_rows_2d(t: &Self::Tensor2D, rows: Range<usize>) -> Self::Tensor2D {
        assert!(rows.end <= t.rows, "Row range out of bounds");
        let n = rows.len();
        let data = t.data[rows.start * t.cols..rows.end * t.cols].to_vec();
        CpuTensor2D::new(data, n, t.cols)
    }
}
