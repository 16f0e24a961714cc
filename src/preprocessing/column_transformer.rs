//! ColumnTransformer implementation.
//!
//! Applies a transformer to each named column subset of a [`RideFrame`] and
//! concatenates the results. Columns no branch names are dropped.

use crate::backend::{Backend, Tensor2D};
use crate::dataset::RideFrame;
use crate::preprocessing::encoding::{FittedOneHotEncoder, OneHotEncoder};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::feature_engineering::{
    DistanceTransformer, FittedDistanceTransformer, FittedTimeFeaturesEncoder, TimeFeaturesEncoder,
};
use crate::preprocessing::pipeline::{FittedPipeline, Pipeline};
use crate::preprocessing::scaling::{FittedStandardScaler, StandardScaler};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use std::marker::PhantomData;
use tracing::debug;

/// Distance followed by standard scaling.
pub type DistancePipeline<B> = Pipeline<B, DistanceTransformer<B>, StandardScaler<B>>;
/// Calendar features followed by one-hot encoding.
pub type TimePipeline<B> = Pipeline<B, TimeFeaturesEncoder<B>, OneHotEncoder<B>>;

type FittedDistancePipeline<B> =
    FittedPipeline<B, FittedDistanceTransformer<B>, FittedStandardScaler<B>>;
type FittedTimePipeline<B> =
    FittedPipeline<B, FittedTimeFeaturesEncoder<B>, FittedOneHotEncoder<B>>;

/// Enum of unfitted frame transformers that can be used in a ColumnTransformer.
#[derive(Clone)]
pub enum ColumnTransformerStep<B: Backend> {
    Distance(DistanceTransformer<B>),
    TimeFeatures(TimeFeaturesEncoder<B>),
    DistancePipeline(DistancePipeline<B>),
    TimePipeline(TimePipeline<B>),
}

impl<B: Backend> From<DistanceTransformer<B>> for ColumnTransformerStep<B> {
    fn from(t: DistanceTransformer<B>) -> Self {
        Self::Distance(t)
    }
}

impl<B: Backend> From<TimeFeaturesEncoder<B>> for ColumnTransformerStep<B> {
    fn from(t: TimeFeaturesEncoder<B>) -> Self {
        Self::TimeFeatures(t)
    }
}

impl<B: Backend> From<DistancePipeline<B>> for ColumnTransformerStep<B> {
    fn from(t: DistancePipeline<B>) -> Self {
        Self::DistancePipeline(t)
    }
}

impl<B: Backend> From<TimePipeline<B>> for ColumnTransformerStep<B> {
    fn from(t: TimePipeline<B>) -> Self {
        Self::TimePipeline(t)
    }
}

impl<B: Backend> ColumnTransformerStep<B> {
    fn fit(&self, data: &RideFrame) -> Result<FittedColumnTransformerStep<B>, PreprocessingError> {
        match self {
            Self::Distance(t) => t.fit(data).map(FittedColumnTransformerStep::Distance),
            Self::TimeFeatures(t) => t.fit(data).map(FittedColumnTransformerStep::TimeFeatures),
            Self::DistancePipeline(t) => {
                t.fit(data).map(FittedColumnTransformerStep::DistancePipeline)
            }
            Self::TimePipeline(t) => t.fit(data).map(FittedColumnTransformerStep::TimePipeline),
        }
    }
}

/// Enum of fitted transformers for ColumnTransformer.
#[derive(Clone)]
pub enum FittedColumnTransformerStep<B: Backend> {
    Distance(FittedDistanceTransformer<B>),
    TimeFeatures(FittedTimeFeaturesEncoder<B>),
    DistancePipeline(FittedDistancePipeline<B>),
    TimePipeline(FittedTimePipeline<B>),
}

impl<B: Backend> FittedColumnTransformerStep<B> {
    fn transform(&self, data: &RideFrame) -> Result<Tensor2D<B>, PreprocessingError> {
        match self {
            Self::Distance(t) => t.transform(data),
            Self::TimeFeatures(t) => t.transform(data),
            Self::DistancePipeline(t) => t.transform(data),
            Self::TimePipeline(t) => t.transform(data),
        }
    }

    fn n_features_out(&self) -> usize {
        match self {
            Self::Distance(t) => t.n_features_out(),
            Self::TimeFeatures(t) => t.n_features_out(),
            Self::DistancePipeline(t) => t.n_features_out(),
            Self::TimePipeline(t) => t.n_features_out(),
        }
    }

    /// Learned one-hot vocabulary, if this step has one.
    pub fn categories(&self) -> Option<&[Vec<i64>]> {
        match self {
            Self::TimePipeline(t) => Some(t.second().categories()),
            _ => None,
        }
    }
}

#[derive(Clone)]
struct Branch<S> {
    name: String,
    columns: Vec<String>,
    step: S,
}

impl<S> Branch<S> {
    fn select(&self, frame: &RideFrame) -> Result<RideFrame, PreprocessingError> {
        let names: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        frame.select(&names)
    }
}

/// Applies one transformer per named column subset and stacks the outputs
/// side by side, in the order the branches were added.
///
/// # Example
/// ```
/// use taxifare::backend::CpuBackend;
/// use taxifare::dataset::{Column, RideFrame};
/// use taxifare::preprocessing::{ColumnTransformer, TimeFeaturesEncoder, Transformer};
///
/// let frame = RideFrame::new()
///     .with_column(
///         "pickup_datetime",
///         Column::Text(vec![Some("2013-07-02 19:54:00 UTC".to_string())]),
///     )
///     .unwrap()
///     .with_column("passenger_count", Column::Numeric(vec![1.0]))
///     .unwrap();
///
/// let ct = ColumnTransformer::<CpuBackend>::new()
///     .add_branch("time", ["pickup_datetime"], TimeFeaturesEncoder::<CpuBackend>::default());
///
/// // passenger_count belongs to no branch and is dropped
/// let out = ct.fit_transform(&frame).unwrap();
/// assert_eq!(out.shape(), (1, 4));
/// ```
#[derive(Clone)]
pub struct ColumnTransformer<B: Backend> {
    branches: Vec<Branch<ColumnTransformerStep<B>>>,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for ColumnTransformer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> ColumnTransformer<B> {
    pub fn new() -> Self {
        Self {
            branches: Vec::new(),
            _backend: PhantomData,
        }
    }

    /// Adds a branch that sees only `columns` of the input frame.
    pub fn add_branch<I, C>(
        mut self,
        name: impl Into<String>,
        columns: I,
        step: impl Into<ColumnTransformerStep<B>>,
    ) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.branches.push(Branch {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            step: step.into(),
        });
        self
    }

    pub fn branch_names(&self) -> Vec<&str> {
        self.branches.iter().map(|b| b.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

impl<B: Backend> Transformer<B> for ColumnTransformer<B> {
    type Input = RideFrame;
    type Output = Tensor2D<B>;
    type Fitted = FittedColumnTransformer<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if self.branches.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "Cannot fit empty ColumnTransformer".to_string(),
            ));
        }
        if data.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit ColumnTransformer on empty data".to_string(),
            ));
        }

        let mut branches = Vec::with_capacity(self.branches.len());
        let mut n_features_out = 0;
        for branch in &self.branches {
            let step = branch.step.fit(&branch.select(data)?)?;
            debug!(
                branch = %branch.name,
                n_features_out = step.n_features_out(),
                "fitted column branch"
            );
            n_features_out += step.n_features_out();
            branches.push(Branch {
                name: branch.name.clone(),
                columns: branch.columns.clone(),
                step,
            });
        }

        Ok(FittedColumnTransformer {
            n_features_in: branches.iter().map(|b| b.columns.len()).sum(),
            n_features_out,
            branches,
            _backend: PhantomData,
        })
    }
}

/// Fitted ColumnTransformer ready for inference.
#[derive(Clone)]
pub struct FittedColumnTransformer<B: Backend> {
    branches: Vec<Branch<FittedColumnTransformerStep<B>>>,
    n_features_in: usize,
    n_features_out: usize,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedColumnTransformer<B> {
    pub fn branch_names(&self) -> Vec<&str> {
        self.branches.iter().map(|b| b.name.as_str()).collect()
    }

    /// Looks up a fitted branch by name.
    pub fn branch(&self, name: &str) -> Option<&FittedColumnTransformerStep<B>> {
        self.branches.iter().find(|b| b.name == name).map(|b| &b.step)
    }
}

impl<B: Backend> FittedTransformer<B> for FittedColumnTransformer<B> {
    type Input = RideFrame;
    type Output = Tensor2D<B>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let blocks = self
            .branches
            .iter()
            .map(|b| b.step.transform(&b.select(data)?))
            .collect::<Result<Vec<_>, _>>()?;
        let out = Tensor2D::hcat(&blocks)?;

        if out.shape().1 != self.n_features_out {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features_out,
                got_features: out.shape().1,
            });
        }
        Ok(out)
    }

    /// Number of frame columns read across all branches.
    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn n_features_out(&self) -> usize {
        self.n_features_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::dataset::{columns, Column};
    use crate::preprocessing::encoding::HandleUnknown;

    const COORDS: [&str; 4] = [
        columns::PICKUP_LATITUDE,
        columns::PICKUP_LONGITUDE,
        columns::DROPOFF_LATITUDE,
        columns::DROPOFF_LONGITUDE,
    ];

    fn frame(times: &[&str]) -> RideFrame {
        let n = times.len();
        let lat: Vec<f64> = (0..n).map(|i| 40.70 + 0.01 * i as f64).collect();
        RideFrame::new()
            .with_column(columns::PICKUP_LATITUDE, Column::Numeric(vec![40.70; n]))
            .unwrap()
            .with_column(columns::PICKUP_LONGITUDE, Column::Numeric(vec![-74.0; n]))
            .unwrap()
            .with_column(columns::DROPOFF_LATITUDE, Column::Numeric(lat))
            .unwrap()
            .with_column(columns::DROPOFF_LONGITUDE, Column::Numeric(vec![-74.0; n]))
            .unwrap()
            .with_column(
                columns::PICKUP_DATETIME,
                Column::Text(times.iter().map(|t| Some(t.to_string())).collect()),
            )
            .unwrap()
            .with_column(columns::PASSENGER_COUNT, Column::Numeric(vec![1.0; n]))
            .unwrap()
    }

    fn fare_transformer() -> ColumnTransformer<CpuBackend> {
        ColumnTransformer::new()
            .add_branch(
                "distance",
                COORDS,
                DistancePipeline::<CpuBackend>::new(DistanceTransformer::new(), StandardScaler::new()),
            )
            .add_branch(
                "time",
                [columns::PICKUP_DATETIME],
                TimePipeline::<CpuBackend>::new(
                    TimeFeaturesEncoder::default(),
                    OneHotEncoder::new().with_handle_unknown(HandleUnknown::Ignore),
                ),
            )
    }

    #[test]
    fn test_distance_block_first_then_one_hot() {
        let train = frame(&["2013-07-02 19:54:00 UTC", "2014-01-06 12:00:00 UTC"]);
        let fitted = fare_transformer().fit(&train).unwrap();

        assert_eq!(fitted.branch_names(), vec!["distance", "time"]);
        // 1 distance + hours{7,15} + weekdays{0,1} + months{1,7} + years{2013,2014}
        assert_eq!(fitted.n_features_out(), 9);
        assert_eq!(fitted.n_features_in(), 5);

        let rows = fitted.transform(&train).unwrap().to_rows();
        // two distances scale to -1 and +1
        assert!((rows[0][0] + 1.0).abs() < 1e-9);
        assert!((rows[1][0] - 1.0).abs() < 1e-9);
        // 15:54 EDT Tuesday July 2013
        assert_eq!(&rows[0][1..], &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0]);
        // 07:00 EST Monday January 2014
        assert_eq!(&rows[1][1..], &[1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_unseen_categories_encode_as_zero_blocks() {
        let train = frame(&["2013-07-02 19:54:00 UTC", "2013-07-02 20:54:00 UTC"]);
        let fitted = fare_transformer().fit(&train).unwrap();
        assert_eq!(fitted.n_features_out(), 1 + 2 + 1 + 1 + 1);

        // Friday 2015-03-13 23:00 EDT: every calendar component is unseen
        let test = frame(&["2015-03-14 03:00:00 UTC"]);
        let rows = fitted.transform(&test).unwrap().to_rows();
        assert_eq!(rows[0].len(), 6);
        assert!(rows[0][1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_vocabulary_is_exposed_per_branch() {
        let train = frame(&["2013-07-02 19:54:00 UTC"]);
        let fitted = fare_transformer().fit(&train).unwrap();
        let categories = fitted.branch("time").and_then(|b| b.categories()).unwrap();
        assert_eq!(categories, &[vec![15], vec![1], vec![7], vec![2013]]);
        assert!(fitted.branch("distance").unwrap().categories().is_none());
        assert!(fitted.branch("nope").is_none());
    }

    #[test]
    fn test_branch_sees_only_its_columns() {
        let train = frame(&["2013-07-02 19:54:00 UTC"]);
        let ct = ColumnTransformer::<CpuBackend>::new().add_branch(
            "distance",
            [columns::PICKUP_LATITUDE, columns::PICKUP_LONGITUDE],
            DistanceTransformer::<CpuBackend>::new(),
        );
        assert!(matches!(
            ct.fit(&train),
            Err(PreprocessingError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_empty_transformer_and_empty_frame() {
        let train = frame(&["2013-07-02 19:54:00 UTC"]);
        assert!(matches!(
            ColumnTransformer::<CpuBackend>::new().fit(&train),
            Err(PreprocessingError::InvalidParameter(_))
        ));
        assert!(matches!(
            fare_transformer().fit(&frame(&[])),
            Err(PreprocessingError::EmptyData(_))
        ));
    }

    #[test]
    fn test_transform_reports_missing_column_at_inference() {
        let train = frame(&["2013-07-02 19:54:00 UTC"]);
        let fitted = fare_transformer().fit(&train).unwrap();
        let test = train.drop_column(columns::PICKUP_DATETIME).unwrap();
        assert!(matches!(
            fitted.transform(&test),
            Err(PreprocessingError::MissingColumn(_))
        ));
    }
}
