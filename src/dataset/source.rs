//! Loading and cleaning ride records.

use super::record::RideRecord;
use crate::error::{FareError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use tracing::{debug, info, warn};

/// Upper bound (exclusive) on a plausible fare.
pub const MAX_FARE: f64 = 4000.0;
/// Upper bound (exclusive) on the passenger count.
pub const MAX_PASSENGERS: i64 = 8;

/// Latitude / longitude box a ride must fall in to be kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

/// Box for pickup points.
pub const PICKUP_BOUNDS: GeoBounds = GeoBounds {
    min_lat: 40.0,
    max_lat: 42.0,
    min_lon: -74.3,
    max_lon: -72.9,
};

/// Box for dropoff points.
pub const DROPOFF_BOUNDS: GeoBounds = GeoBounds {
    min_lat: 40.0,
    max_lat: 42.0,
    min_lon: -74.0,
    max_lon: -72.9,
};

/// Reads up to `row_limit` ride records from a local CSV path or an
/// `http://` / `https://` URL.
pub fn get_data(source: &str, row_limit: usize) -> Result<Vec<RideRecord>> {
    info!(source, row_limit, "loading ride records");
    let records = if source.starts_with("http://") || source.starts_with("https://") {
        let response = reqwest::blocking::get(source)?.error_for_status()?;
        read_records(response, row_limit)?
    } else {
        let file = File::open(source)?;
        read_records(BufReader::new(file), row_limit)?
    };
    info!(rows = records.len(), "loaded ride records");
    Ok(records)
}

/// Deserializes up to `row_limit` records from CSV with a header row.
pub fn read_records<R: Read>(reader: R, row_limit: usize) -> Result<Vec<RideRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.deserialize::<RideRecord>().take(row_limit) {
        records.push(result?);
    }
    Ok(records)
}

/// Why [`clean_data`] dropped a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Incomplete,
    ZeroCoordinates,
    Fare,
    Passengers,
    OutOfBounds,
}

fn check(record: &RideRecord) -> std::result::Result<(), Rejection> {
    let (
        Some(fare),
        Some(passengers),
        Some(pickup_lat),
        Some(pickup_lon),
        Some(dropoff_lat),
        Some(dropoff_lon),
    ) = (
        record.fare_amount,
        record.passenger_count,
        record.pickup_latitude,
        record.pickup_longitude,
        record.dropoff_latitude,
        record.dropoff_longitude,
    )
    else {
        return Err(Rejection::Incomplete);
    };
    if !record.is_complete() {
        return Err(Rejection::Incomplete);
    }
    if (pickup_lat == 0.0 && pickup_lon == 0.0) || (dropoff_lat == 0.0 && dropoff_lon == 0.0) {
        return Err(Rejection::ZeroCoordinates);
    }
    if !(fare > 0.0 && fare < MAX_FARE) {
        return Err(Rejection::Fare);
    }
    if !(0..MAX_PASSENGERS).contains(&passengers) {
        return Err(Rejection::Passengers);
    }
    if !PICKUP_BOUNDS.contains(pickup_lat, pickup_lon)
        || !DROPOFF_BOUNDS.contains(dropoff_lat, dropoff_lon)
    {
        return Err(Rejection::OutOfBounds);
    }
    Ok(())
}

/// Drops incomplete and implausible rides.
///
/// Kept rows have every field present, non-zero pickup and dropoff points,
/// `0 < fare_amount < 4000`, `0 <= passenger_count < 8`, and both points
/// inside [`PICKUP_BOUNDS`] / [`DROPOFF_BOUNDS`].
pub fn clean_data(records: Vec<RideRecord>) -> Vec<RideRecord> {
    let before = records.len();
    let mut dropped = [0usize; 5];
    let kept: Vec<RideRecord> = records
        .into_iter()
        .filter(|r| match check(r) {
            Ok(()) => true,
            Err(reason) => {
                dropped[reason as usize] += 1;
                false
            }
        })
        .collect();

    if kept.len() < before {
        warn!(
            before,
            after = kept.len(),
            incomplete = dropped[Rejection::Incomplete as usize],
            zero_coordinates = dropped[Rejection::ZeroCoordinates as usize],
            fare = dropped[Rejection::Fare as usize],
            passengers = dropped[Rejection::Passengers as usize],
            out_of_bounds = dropped[Rejection::OutOfBounds as usize],
            "dropped rows during cleaning"
        );
    } else {
        debug!(rows = before, "cleaning kept every row");
    }
    kept
}

/// Fails with a data error when cleaning left nothing to train on.
pub fn ensure_non_empty(records: &[RideRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(FareError::Data("no rows left after cleaning".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ride() -> RideRecord {
        RideRecord {
            key: Some("k".to_string()),
            fare_amount: Some(8.5),
            pickup_datetime: Some("2013-07-02 19:54:00 UTC".to_string()),
            pickup_longitude: Some(-73.98),
            pickup_latitude: Some(40.75),
            dropoff_longitude: Some(-73.95),
            dropoff_latitude: Some(40.78),
            passenger_count: Some(1),
        }
    }

    #[test]
    fn test_clean_keeps_valid_ride() {
        assert_eq!(clean_data(vec![ride()]), vec![ride()]);
    }

    #[test]
    fn test_clean_drops_each_rule() {
        let cases = vec![
            RideRecord {
                fare_amount: None,
                ..ride()
            },
            RideRecord {
                pickup_datetime: None,
                ..ride()
            },
            RideRecord {
                pickup_latitude: Some(0.0),
                pickup_longitude: Some(0.0),
                ..ride()
            },
            RideRecord {
                fare_amount: Some(0.0),
                ..ride()
            },
            RideRecord {
                fare_amount: Some(4000.0),
                ..ride()
            },
            RideRecord {
                passenger_count: Some(8),
                ..ride()
            },
            RideRecord {
                passenger_count: Some(-1),
                ..ride()
            },
            RideRecord {
                pickup_latitude: Some(39.9),
                ..ride()
            },
            RideRecord {
                pickup_longitude: Some(-74.31),
                ..ride()
            },
            RideRecord {
                dropoff_longitude: Some(-74.1),
                ..ride()
            },
        ];
        assert!(clean_data(cases).is_empty());
    }

    #[test]
    fn test_clean_boundaries_are_inclusive() {
        let edge = RideRecord {
            passenger_count: Some(0),
            pickup_latitude: Some(42.0),
            pickup_longitude: Some(-74.3),
            dropoff_latitude: Some(40.0),
            dropoff_longitude: Some(-74.0),
            ..ride()
        };
        assert_eq!(clean_data(vec![edge.clone()]), vec![edge]);
    }

    #[test]
    fn test_read_records_respects_row_limit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "key,fare_amount,pickup_datetime,pickup_longitude,pickup_latitude,dropoff_longitude,dropoff_latitude,passenger_count"
        )
        .unwrap();
        for i in 0..5 {
            writeln!(
                file,
                "k{i},{}.5,2013-07-02 19:54:00 UTC,-73.98,40.75,-73.95,40.78,1",
                i + 5
            )
            .unwrap();
        }
        file.flush().unwrap();

        let path = file.path().to_str().unwrap();
        let records = get_data(path, 3).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].fare_amount, Some(7.5));
        assert_eq!(get_data(path, 100).unwrap().len(), 5);
    }

    #[test]
    fn test_get_data_missing_file() {
        assert!(matches!(
            get_data("/definitely/not/here.csv", 10),
            Err(FareError::Io(_))
        ));
    }

    #[test]
    fn test_ensure_non_empty() {
        assert!(matches!(ensure_non_empty(&[]), Err(FareError::Data(_))));
        assert!(ensure_non_empty(&[ride()]).is_ok());
    }
}
