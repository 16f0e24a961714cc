//! Feature preprocessing: the fit/transform layer between raw ride columns and
//! the design matrix the linear model trains on.
//!
//! Transformers use distinct unfitted/fitted types, so calling `transform`
//! before `fit` does not compile.
//!
//! # Core Traits
//!
//! - [`Transformer`]: unfitted transformer holding hyperparameters
//! - [`FittedTransformer`]: fitted transformer ready for inference
//! - [`StatelessTransformer`]: transformers with nothing to learn
//!
//! # Available Transformers
//!
//! ## Feature engineering
//! - [`DistanceTransformer`]: haversine distance between pickup and dropoff
//! - [`TimeFeaturesEncoder`]: hour, weekday, month and year in a timezone
//!
//! ## Scaling and encoding
//! - [`StandardScaler`]: z-score normalization
//! - [`OneHotEncoder`]: indicator columns per learned category
//!
//! ## Composition
//! - [`Pipeline`]: two stages, the second fitted on the first's output
//! - [`ColumnTransformer`]: named branches over column subsets, concatenated
//!
//! # Example
//!
//! ```
//! use taxifare::backend::{CpuBackend, Tensor2D};
//! use taxifare::preprocessing::{FittedTransformer, StandardScaler, Transformer};
//!
//! let train = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0], 3, 1);
//! let fitted = StandardScaler::<CpuBackend>::new().fit(&train).unwrap();
//!
//! // statistics come from the training data only
//! let test = Tensor2D::<CpuBackend>::new(vec![2.0], 1, 1);
//! assert_eq!(fitted.transform(&test).unwrap().to_vec(), vec![0.0]);
//! ```

pub mod column_transformer;
pub mod encoding;
pub mod error;
pub mod feature_engineering;
pub mod pipeline;
pub mod scaling;
pub mod traits;

pub use column_transformer::{
    ColumnTransformer, ColumnTransformerStep, DistancePipeline, FittedColumnTransformer,
    FittedColumnTransformerStep, TimePipeline,
};
pub use encoding::{FittedOneHotEncoder, HandleUnknown, OneHotEncoder};
pub use error::PreprocessingError;
pub use feature_engineering::{
    haversine_km, parse_timestamp, CalendarFeatures, CoordinateColumns, DistanceTransformer,
    FittedDistanceTransformer, FittedTimeFeaturesEncoder, TimeFeaturesEncoder, DEFAULT_TIMEZONE,
    EARTH_RADIUS_KM, N_TIME_FEATURES,
};
pub use pipeline::{FittedPipeline, Pipeline};
pub use scaling::{FittedStandardScaler, StandardScaler, StandardScalerConfig};
pub use traits::{FittedTransformer, StatelessTransformer, Transformer};
