//! Two-stage transformer chain.
//!
//! A [`Pipeline`] feeds the output of its first stage into its second. During
//! `fit`, the second stage is fitted on the first stage's transformed training
//! data, so the scaler after a distance transform learns distance statistics.
//!
//! # Example
//! ```
//! use taxifare::backend::{CpuBackend, Tensor2D};
//! use taxifare::preprocessing::{FittedTransformer, Pipeline, StandardScaler, Transformer};
//!
//! // centre, then scale what is left
//! let pipeline = Pipeline::new(
//!     StandardScaler::<CpuBackend>::new().with_std(false),
//!     StandardScaler::<CpuBackend>::new().with_mean(false),
//! );
//!
//! let data = Tensor2D::<CpuBackend>::new(vec![1.0, 3.0], 2, 1);
//! let fitted = pipeline.fit(&data).unwrap();
//! assert_eq!(fitted.transform(&data).unwrap().to_vec(), vec![-1.0, 1.0]);
//! ```

use crate::backend::{Backend, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use std::marker::PhantomData;

/// Pipeline transformer (unfitted): `first` then `second`.
#[derive(Clone, Debug)]
pub struct Pipeline<B, F, S>
where
    B: Backend,
    F: Transformer<B, Output = Tensor2D<B>>,
    S: Transformer<B, Input = Tensor2D<B>>,
{
    first: F,
    second: S,
    _backend: PhantomData<B>,
}

impl<B, F, S> Pipeline<B, F, S>
where
    B: Backend,
    F: Transformer<B, Output = Tensor2D<B>>,
    S: Transformer<B, Input = Tensor2D<B>>,
{
    pub fn new(first: F, second: S) -> Self {
        Self {
            first,
            second,
            _backend: PhantomData,
        }
    }

    pub fn first(&self) -> &F {
        &self.first
    }

    pub fn second(&self) -> &S {
        &self.second
    }
}

impl<B, F, S> Transformer<B> for Pipeline<B, F, S>
where
    B: Backend,
    F: Transformer<B, Output = Tensor2D<B>>,
    S: Transformer<B, Input = Tensor2D<B>>,
{
    type Input = F::Input;
    type Output = S::Output;
    type Fitted = FittedPipeline<B, F::Fitted, S::Fitted>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let first = self.first.fit(data)?;
        let intermediate = first.transform(data)?;
        let second = self.second.fit(&intermediate)?;

        if second.n_features_in() != first.n_features_out() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: first.n_features_out(),
                got_features: second.n_features_in(),
            });
        }

        Ok(FittedPipeline {
            first,
            second,
            _backend: PhantomData,
        })
    }
}

/// Fitted Pipeline ready for inference.
#[derive(Clone, Debug)]
pub struct FittedPipeline<B, F, S>
where
    B: Backend,
    F: FittedTransformer<B, Output = Tensor2D<B>>,
    S: FittedTransformer<B, Input = Tensor2D<B>>,
{
    first: F,
    second: S,
    _backend: PhantomData<B>,
}

impl<B, F, S> FittedPipeline<B, F, S>
where
    B: Backend,
    F: FittedTransformer<B, Output = Tensor2D<B>>,
    S: FittedTransformer<B, Input = Tensor2D<B>>,
{
    pub fn first(&self) -> &F {
        &self.first
    }

    pub fn second(&self) -> &S {
        &self.second
    }
}

impl<B, F, S> FittedTransformer<B> for FittedPipeline<B, F, S>
where
    B: Backend,
    F: FittedTransformer<B, Output = Tensor2D<B>>,
    S: FittedTransformer<B, Input = Tensor2D<B>>,
{
    type Input = F::Input;
    type Output = S::Output;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.second.transform(&self.first.transform(data)?)
    }

    fn n_features_in(&self) -> usize {
        self.first.n_features_in()
    }

    fn n_features_out(&self) -> usize {
        self.second.n_features_out()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::preprocessing::{HandleUnknown, OneHotEncoder, StandardScaler};

    #[test]
    fn test_second_stage_fits_on_first_stage_output() {
        let data = Tensor2D::<CpuBackend>::new(vec![10.0, 20.0, 30.0], 3, 1);
        let pipeline = Pipeline::new(
            StandardScaler::<CpuBackend>::new().with_std(false),
            StandardScaler::<CpuBackend>::new(),
        );
        let fitted = pipeline.fit(&data).unwrap();

        // the second scaler saw centred data
        assert_eq!(fitted.second().mean().to_vec(), vec![0.0]);
        assert_eq!(fitted.first().mean().to_vec(), vec![20.0]);
        assert_eq!(fitted.n_features_in(), 1);
        assert_eq!(fitted.n_features_out(), 1);
    }

    #[test]
    fn test_pipeline_output_width_follows_last_stage() {
        let data = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 1.0], 4, 1);
        let pipeline = Pipeline::new(
            StandardScaler::<CpuBackend>::new().with_mean(false).with_std(false),
            OneHotEncoder::<CpuBackend>::new().with_handle_unknown(HandleUnknown::Ignore),
        );
        let out = pipeline.fit_transform(&data).unwrap();
        assert_eq!(out.shape(), (4, 3));
        assert_eq!(out.to_rows()[3], vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_pipeline_propagates_first_stage_errors() {
        let data = Tensor2D::<CpuBackend>::zeros(0, 1);
        let pipeline = Pipeline::new(
            StandardScaler::<CpuBackend>::new(),
            StandardScaler::<CpuBackend>::new(),
        );
        assert!(matches!(
            pipeline.fit(&data),
            Err(PreprocessingError::EmptyData(_))
        ));
    }
}
