use super::scalar::Scalar;
use crate::backend::Backend;
use std::marker::PhantomData;

/// Backend-typed 1D tensor.
///
/// Wraps a backend's native vector (`B::Tensor1D`) and carries the backend as a
/// phantom type, so a CPU tensor cannot be combined with an ndarray tensor.
///
/// # Example
/// ```
/// use taxifare::backend::{CpuBackend, Scalar, Tensor1D};
///
/// let x: Tensor1D<CpuBackend> = Tensor1D::new(vec![1.0, 2.0, 3.0]);
/// assert_eq!(x.len(), 3);
///
/// let y = x.scale(&Scalar::<CpuBackend>::new(2.0));
/// assert_eq!(y.to_vec(), vec![2.0, 4.0, 6.0]);
/// ```
#[derive(Clone)]
pub struct Tensor1D<B: Backend> {
    pub(crate) data: B::Tensor1D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor1D<B> {
    /// Creates a new 1D tensor from host values.
    pub fn new(data: Vec<f64>) -> Self {
        Self::from_raw(B::from_vec_1d(data))
    }

    pub(crate) fn from_raw(data: B::Tensor1D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Creates a 1D tensor filled with zeros.
    pub fn zeros(len: usize) -> Self {
        Self::from_raw(B::zeros_1d(len))
    }

    /// Element-wise `self - other`.
    pub fn sub(&self, other: &Self) -> Self {
        Self::from_raw(B::sub_1d(&self.data, &other.data))
    }

    /// Element-wise `self + other`.
    pub fn add(&self, other: &Self) -> Self {
        Self::from_raw(B::add_1d(&self.data, &other.data))
    }

    /// Multiplies every element by `s`.
    pub fn scale(&self, s: &Scalar<B>) -> Self {
        Self::from_raw(B::mul_scalar_1d(&self.data, &s.data))
    }

    /// Adds `s` to every element.
    pub fn add_scalar(&self, s: &Scalar<B>) -> Self {
        Self::from_raw(B::add_scalar_1d(&self.data, &s.data))
    }

    /// Inner product.
    pub fn dot(&self, other: &Self) -> Scalar<B> {
        Scalar::from_raw(B::dot_1d(&self.data, &other.data))
    }

    /// Sum of all elements.
    pub fn sum(&self) -> Scalar<B> {
        Scalar::from_raw(B::sum_all_1d(&self.data))
    }

    /// Arithmetic mean of all elements.
    pub fn mean(&self) -> Scalar<B> {
        Scalar::from_raw(B::mean_all_1d(&self.data))
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        B::len_1d(&self.data)
    }

    /// Whether the tensor holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the values out to the host.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_1d(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_tensor1d_elementwise() {
        let a = Tensor1D::<CpuBackend>::new(vec![5.0, 7.0, 9.0]);
        let b = Tensor1D::<CpuBackend>::new(vec![2.0, 3.0, 4.0]);

        assert_eq!(a.sub(&b).to_vec(), vec![3.0, 4.0, 5.0]);
        assert_eq!(a.add(&b).to_vec(), vec![7.0, 10.0, 13.0]);
        assert_eq!(
            a.add_scalar(&Scalar::new(1.0)).to_vec(),
            vec![6.0, 8.0, 10.0]
        );
    }

    #[test]
    fn test_tensor1d_reductions() {
        let a = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0]);

        assert_eq!(a.sum().to_f64(), 10.0);
        assert_eq!(a.mean().to_f64(), 2.5);
        assert_eq!(a.dot(&a).to_f64(), 30.0);
    }

    #[test]
    fn test_tensor1d_zeros_and_len() {
        let z = Tensor1D::<CpuBackend>::zeros(3);
        assert_eq!(z.to_vec(), vec![0.0; 3]);
        assert_eq!(z.len(), 3);
        assert!(!z.is_empty());
        assert!(Tensor1D::<CpuBackend>::zeros(0).is_empty());
    }
}
