//! Feature engineering transformers: turn raw ride columns into numeric features.

mod distance;
mod time_features;

pub use distance::{
    haversine_km, CoordinateColumns, DistanceTransformer, FittedDistanceTransformer,
    EARTH_RADIUS_KM,
};
pub use time_features::{
    parse_timestamp, CalendarFeatures, FittedTimeFeaturesEncoder, TimeFeaturesEncoder,
    DEFAULT_TIMEZONE, N_TIME_FEATURES,
};
