use crate::backend::Backend;
use std::marker::PhantomData;

/// Scalar operations required by numerical backends.
///
/// Implemented for the primitive floating-point type a backend computes in.
///
/// # Example
/// ```
/// use taxifare::backend::ScalarOps;
///
/// let x = 4.0f64;
/// assert_eq!(ScalarOps::sqrt(x), 2.0);
/// assert_eq!(f64::zero(), 0.0);
/// assert_eq!(f64::one(), 1.0);
/// ```
pub trait ScalarOps:
    Clone
    + Copy
    + Send
    + Sync
    + std::fmt::Debug
    + std::ops::Add<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Div<Output = Self>
{
    /// Computes the square root of the scalar.
    fn sqrt(self) -> Self;

    /// Returns the absolute value of the scalar.
    fn abs(self) -> Self;

    /// Returns the additive identity.
    fn zero() -> Self;

    /// Returns the multiplicative identity.
    fn one() -> Self;

    /// Converts an `f64` value to this scalar type.
    fn from_f64(v: f64) -> Self;

    /// Converts this scalar to an `f64` value.
    fn to_f64(self) -> f64;
}

impl ScalarOps for f64 {
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    fn abs(self) -> Self {
        f64::abs(self)
    }

    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn from_f64(v: f64) -> Self {
        v
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// Backend-typed scalar wrapper.
///
/// Carries the originating backend as a phantom type so scalars from different
/// backends cannot be mixed.
///
/// # Example
/// ```
/// use taxifare::backend::{CpuBackend, Scalar};
///
/// let s: Scalar<CpuBackend> = Scalar::new(2.0);
/// let squared = s * s;
/// assert_eq!(squared.to_f64(), 4.0);
/// ```
#[derive(Clone, Debug, Copy)]
pub struct Scalar<B: Backend> {
    pub(crate) data: B::Scalar,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Scalar<B> {
    /// Creates a new scalar from an `f64` host value.
    pub fn new(f: f64) -> Self {
        Self {
            data: B::scalar_f64(f),
            backend: PhantomData,
        }
    }

    pub(crate) fn from_raw(data: B::Scalar) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Converts this backend scalar to a host `f64` value.
    pub fn to_f64(&self) -> f64 {
        self.data.to_f64()
    }

    /// Square root.
    pub fn sqrt(&self) -> Self {
        Self::from_raw(self.data.sqrt())
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Self::from_raw(self.data.abs())
    }
}

impl<B: Backend> std::ops::Add for Scalar<B> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_raw(self.data + rhs.data)
    }
}

impl<B: Backend> std::ops::Sub for Scalar<B> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_raw(self.data - rhs.data)
    }
}

impl<B: Backend> std::ops::Mul for Scalar<B> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_raw(self.data * rhs.data)
    }
}

impl<B: Backend> std::ops::Div for Scalar<B> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::from_raw(self.data / rhs.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_scalar_ops_f64() {
        assert_eq!(ScalarOps::sqrt(9.0f64), 3.0);
        assert_eq!(ScalarOps::abs(-2.5f64), 2.5);
        assert_eq!(f64::from_f64(1.5).to_f64(), 1.5);
    }

    #[test]
    fn test_scalar_arithmetic() {
        let a = Scalar::<CpuBackend>::new(6.0);
        let b = Scalar::<CpuBackend>::new(2.0);

        assert_eq!((a + b).to_f64(), 8.0);
        assert_eq!((a - b).to_f64(), 4.0);
        assert_eq!((a * b).to_f64(), 12.0);
        assert_eq!((a / b).to_f64(), 3.0);
    }

    #[test]
    fn test_scalar_sqrt_abs() {
        let s = Scalar::<CpuBackend>::new(-16.0);
        assert_eq!(s.abs().sqrt().to_f64(), 4.0);
    }
}
