//! One CSV row of ride data and the column names it maps to.

use serde::{Deserialize, Serialize};

/// Column names of the ride CSV, shared by the frame and the feature pipeline.
pub mod columns {
    pub const KEY: &str = "key";
    pub const FARE_AMOUNT: &str = "fare_amount";
    pub const PICKUP_DATETIME: &str = "pickup_datetime";
    pub const PICKUP_LONGITUDE: &str = "pickup_longitude";
    pub const PICKUP_LATITUDE: &str = "pickup_latitude";
    pub const DROPOFF_LONGITUDE: &str = "dropoff_longitude";
    pub const DROPOFF_LATITUDE: &str = "dropoff_latitude";
    pub const PASSENGER_COUNT: &str = "passenger_count";
}

/// One ride as read from the source CSV.
///
/// Every field is optional: blank cells and unparseable numbers load as `None`
/// and are removed later by [`clean_data`](crate::dataset::clean_data).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RideRecord {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub fare_amount: Option<f64>,
    #[serde(default)]
    pub pickup_datetime: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub pickup_longitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub pickup_latitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub dropoff_longitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub dropoff_latitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub passenger_count: Option<i64>,
}

impl RideRecord {
    /// True when every field the pipeline or the cleaning rules read is present.
    ///
    /// `key` is an identifier only and may be absent.
    pub fn is_complete(&self) -> bool {
        self.fare_amount.is_some()
            && self
                .pickup_datetime
                .as_deref()
                .is_some_and(|s| !s.trim().is_empty())
            && self.pickup_longitude.is_some()
            && self.pickup_latitude.is_some()
            && self.dropoff_longitude.is_some()
            && self.dropoff_latitude.is_some()
            && self.passenger_count.is_some()
    }
}
