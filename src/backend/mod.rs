//! # Backend Abstraction
//!
//! Every matrix in the fare pipeline (the distance column, the one-hot calendar
//! block, the assembled design matrix, the model weights) is held in a
//! backend-typed tensor. Transformers and the linear model are generic over
//! [`Backend`], so the same pipeline runs on the pure-Rust [`CpuBackend`] or on
//! [`NdarrayBackend`] without code changes.
//!
//! ## Available Backends
//!
//! | Backend          | Feature   | Use Case                          |
//! |------------------|-----------|-----------------------------------|
//! | `CpuBackend`     | `cpu`     | Default, pure-Rust implementation |
//! | `NdarrayBackend` | `ndarray` | Interop with `ndarray` ecosystem  |
//!
//! ## Example
//!
//! ```rust
//! use taxifare::backend::{CpuBackend, Tensor1D, Tensor2D};
//!
//! let x: Tensor1D<CpuBackend> = Tensor1D::new(vec![1.0, 2.0]);
//! let w: Tensor2D<CpuBackend> = Tensor2D::new(vec![0.5, 0.5, 0.5, 0.5], 2, 2);
//!
//! let y = w.dot(&x);
//! assert_eq!(y.to_vec(), vec![1.5, 1.5]);
//! ```

use crate::preprocessing::PreprocessingError;
use std::ops::Range;

#[cfg(feature = "cpu")]
pub mod cpu;
#[cfg(feature = "cpu")]
/// Pure-Rust CPU backend implementation with zero external dependencies.
pub use cpu::{CpuBackend, CpuTensor2D};

#[cfg(feature = "ndarray")]
mod ndarray_backend;
#[cfg(feature = "ndarray")]
/// Backend backed by the `ndarray` crate for ecosystem interoperability.
pub use ndarray_backend::NdarrayBackend;

/// Scalar value representation and arithmetic operations.
pub mod scalar;
/// One-dimensional tensor abstraction.
pub mod tensor1d;
/// Two-dimensional tensor abstraction.
pub mod tensor2d;

pub use scalar::{Scalar, ScalarOps};
pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

/// Abstraction over tensor storage and the numeric kernels the pipeline needs.
///
/// The surface is deliberately small: constructors, a handful of element-wise
/// ops for gradient descent, matrix-vector products for the linear model, and
/// column statistics / concatenation for preprocessing.
///
/// All 2D tensors are row-major: `from_vec_2d(data, rows, cols)` reads
/// `data[i * cols + j]` as element `(i, j)`.
pub trait Backend: Clone + Copy + std::fmt::Debug + 'static {
    /// Scalar type supporting arithmetic operations.
    type Scalar: ScalarOps;

    /// One-dimensional tensor type.
    type Tensor1D: Clone + Send + Sync;

    /// Two-dimensional tensor type.
    type Tensor2D: Clone + Send + Sync;

    // --- Constructors ---

    /// Creates a 1D tensor filled with zeros of given length.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Creates a 2D tensor filled with zeros of given dimensions.
    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D;

    /// Constructs a 1D tensor from owned data.
    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D;

    /// Constructs a 2D tensor from row-major ordered data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D;

    /// Creates a backend-specific scalar from an f64 value.
    fn scalar_f64(value: f64) -> Self::Scalar;

    // --- Element-wise operations (1D) ---

    /// Element-wise addition of two 1D tensors.
    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Element-wise subtraction of two 1D tensors.
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Multiplies each element of tensor by a scalar.
    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;

    /// Adds a scalar to each element of tensor.
    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;

    // --- Reductions ---

    /// Inner product of two 1D tensors of equal length.
    fn dot_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Scalar;

    /// Computes the sum of all elements in a 1D tensor.
    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Computes the arithmetic mean of all elements in a 1D tensor.
    ///
    /// Returns NaN for an empty tensor.
    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    // --- Data access ---

    /// Converts a 1D tensor to a Vec of f64 values.
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64>;

    /// Returns the number of elements in a 1D tensor.
    fn len_1d(t: &Self::Tensor1D) -> usize;

    /// Flattens a 2D tensor into row-major f64 values.
    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64>;

    /// Returns the shape of a 2D tensor as (rows, cols).
    fn shape(t: &Self::Tensor2D) -> (usize, usize);

    // --- Linear algebra ---

    /// Computes `y = A * x` where `A` is (m × n) and `x` is (n,).
    ///
    /// # Panics
    /// If `A.cols() != x.len()`.
    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    /// Computes `y = A^T * x` where `A` is (m × n) and `x` is (m,).
    ///
    /// # Panics
    /// If `A.rows() != x.len()`.
    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    // --- Column-wise operations (for preprocessing) ---

    /// Computes the mean of each column (axis 0).
    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Computes the standard deviation of each column.
    ///
    /// `ddof` is the delta degrees of freedom (0 for population std).
    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D;

    /// `Result[i, j] = t[i, j] - v[j]`
    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// `Result[i, j] = t[i, j] / v[j]`
    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    // --- Row / column manipulation ---

    /// Horizontally concatenate 2D tensors (stack columns side by side).
    ///
    /// All inputs must share a row count; the slice must not be empty.
    fn hcat_2d(tensors: &[Self::Tensor2D]) -> Result<Self::Tensor2D, PreprocessingError>;

    /// Copies the contiguous row range `rows` into a new tensor.
    ///
    /// # Panics
    /// If the range exceeds the row count.
    fn slice_rows_2d(t: &Self::Tensor2D, rows: Range<usize>) -> Self::Tensor2D;
}

/// Checks the shared preconditions of [`Backend::hcat_2d`] and returns the
/// common row count and the total column count.
pub(crate) fn hcat_shape(shapes: &[(usize, usize)]) -> Result<(usize, usize), PreprocessingError> {
    let Some(&(rows, _)) = shapes.first() else {
        return Err(PreprocessingError::EmptyData(
            "cannot concatenate an empty list of tensors".to_string(),
        ));
    };
    if let Some(&(bad, _)) = shapes.iter().find(|(r, _)| *r != rows) {
        return Err(PreprocessingError::InvalidShape {
            expected: format!("{rows} rows"),
            got: format!("{bad} rows"),
        });
    }
    Ok((rows, shapes.iter().map(|(_, c)| c).sum()))
}
