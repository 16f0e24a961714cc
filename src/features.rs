//! The fare feature pipeline: scaled trip distance followed by one-hot
//! calendar features.

use crate::backend::Backend;
use crate::dataset::columns;
use crate::preprocessing::{
    ColumnTransformer, CoordinateColumns, DistancePipeline, DistanceTransformer,
    FittedColumnTransformer, HandleUnknown, OneHotEncoder, StandardScaler, TimeFeaturesEncoder,
    TimePipeline,
};
use chrono_tz::Tz;

pub const DISTANCE_BRANCH: &str = "distance";
pub const TIME_BRANCH: &str = "time";

pub type FeaturePipeline<B> = ColumnTransformer<B>;
pub type FittedFeaturePipeline<B> = FittedColumnTransformer<B>;

/// Builds the unfitted feature pipeline.
///
/// Output columns: `[scaled distance, one-hot(hour), one-hot(weekday),
/// one-hot(month), one-hot(year)]`. Calendar values not seen during `fit`
/// encode as zeros. Every other frame column is dropped.
///
/// ```
/// use taxifare::backend::CpuBackend;
/// use taxifare::features::feature_pipeline;
/// use taxifare::preprocessing::DEFAULT_TIMEZONE;
///
/// let pipeline = feature_pipeline::<CpuBackend>(DEFAULT_TIMEZONE);
/// assert_eq!(pipeline.branch_names(), vec!["distance", "time"]);
/// ```
pub fn feature_pipeline<B: Backend>(timezone: Tz) -> FeaturePipeline<B> {
    let coordinates = CoordinateColumns::default();
    let distance = DistancePipeline::<B>::new(
        DistanceTransformer::with_columns(coordinates.clone()),
        StandardScaler::new(),
    );
    let time = TimePipeline::<B>::new(
        TimeFeaturesEncoder::new(columns::PICKUP_DATETIME).with_timezone(timezone),
        OneHotEncoder::new().with_handle_unknown(HandleUnknown::Ignore),
    );

    ColumnTransformer::new()
        .add_branch(DISTANCE_BRANCH, coordinates.names(), distance)
        .add_branch(TIME_BRANCH, [columns::PICKUP_DATETIME], time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::dataset::{RideFrame, RideRecord};
    use crate::preprocessing::{FittedTransformer, Transformer, DEFAULT_TIMEZONE};

    fn ride(datetime: &str, dropoff_lat: f64) -> RideRecord {
        RideRecord {
            key: None,
            fare_amount: Some(8.0),
            pickup_datetime: Some(datetime.to_string()),
            pickup_longitude: Some(-73.99),
            pickup_latitude: Some(40.75),
            dropoff_longitude: Some(-73.99),
            dropoff_latitude: Some(dropoff_lat),
            passenger_count: Some(1),
        }
    }

    #[test]
    fn test_layout_and_width() {
        let frame = RideFrame::from_records(&[
            ride("2013-07-02 19:54:00 UTC", 40.76),
            ride("2013-07-03 19:54:00 UTC", 40.78),
            ride("2013-07-03 12:10:00 UTC", 40.80),
        ]);
        let fitted = feature_pipeline::<CpuBackend>(DEFAULT_TIMEZONE)
            .fit(&frame)
            .unwrap();

        // distance + hours{8,15} + weekdays{1,2} + month{7} + year{2013}
        assert_eq!(fitted.n_features_out(), 7);
        let out = fitted.transform(&frame).unwrap();
        assert_eq!(out.shape(), (3, 7));

        // scaled distance column has zero mean
        let rows = out.to_rows();
        let mean: f64 = rows.iter().map(|r| r[0]).sum::<f64>() / 3.0;
        assert!(mean.abs() < 1e-9);
        // each one-hot block has exactly one hot cell per training row
        for row in &rows {
            assert_eq!(row[1..].iter().sum::<f64>(), 4.0);
        }
    }

    #[test]
    fn test_timezone_changes_hour_block() {
        let frame = RideFrame::from_records(&[ride("2013-07-02 02:00:00 UTC", 40.76)]);
        let ny = feature_pipeline::<CpuBackend>(DEFAULT_TIMEZONE)
            .fit(&frame)
            .unwrap();
        let utc = feature_pipeline::<CpuBackend>(chrono_tz::UTC)
            .fit(&frame)
            .unwrap();

        // 22:00 Monday in New York, 02:00 Tuesday in UTC
        let ny_cats = ny.branch(TIME_BRANCH).and_then(|b| b.categories()).unwrap();
        let utc_cats = utc.branch(TIME_BRANCH).and_then(|b| b.categories()).unwrap();
        assert_eq!(ny_cats[0], vec![22]);
        assert_eq!(ny_cats[1], vec![0]);
        assert_eq!(utc_cats[0], vec![2]);
        assert_eq!(utc_cats[1], vec![1]);
    }
}
