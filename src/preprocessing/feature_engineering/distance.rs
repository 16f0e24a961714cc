//! Great-circle distance between pickup and dropoff points.

use crate::backend::{Backend, Tensor2D};
use crate::dataset::{columns, RideFrame};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, StatelessTransformer, Transformer};
use std::marker::PhantomData;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two points given in degrees.
///
/// The haversine term is clamped to `[0, 1]` so rounding can never push the
/// inverse sine out of its domain (identical or antipodal points).
///
/// ```
/// use taxifare::preprocessing::haversine_km;
///
/// assert_eq!(haversine_km(40.7, -74.0, 40.7, -74.0), 0.0);
/// let d = haversine_km(40.7128, -74.0060, 40.7580, -73.9855);
/// assert!((d - 5.3).abs() < 0.1);
/// ```
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.clamp(0.0, 1.0).sqrt().asin()
}

/// Names of the four coordinate columns read by [`DistanceTransformer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoordinateColumns {
    pub pickup_latitude: String,
    pub pickup_longitude: String,
    pub dropoff_latitude: String,
    pub dropoff_longitude: String,
}

impl Default for CoordinateColumns {
    fn default() -> Self {
        Self {
            pickup_latitude: columns::PICKUP_LATITUDE.to_string(),
            pickup_longitude: columns::PICKUP_LONGITUDE.to_string(),
            dropoff_latitude: columns::DROPOFF_LATITUDE.to_string(),
            dropoff_longitude: columns::DROPOFF_LONGITUDE.to_string(),
        }
    }
}

impl CoordinateColumns {
    /// Column names in `[pickup_lat, pickup_lon, dropoff_lat, dropoff_lon]` order.
    pub fn names(&self) -> [&str; 4] {
        [
            &self.pickup_latitude,
            &self.pickup_longitude,
            &self.dropoff_latitude,
            &self.dropoff_longitude,
        ]
    }

    fn distances<B: Backend>(&self, frame: &RideFrame) -> Result<Tensor2D<B>, PreprocessingError> {
        let names = self.names();
        let cols = names
            .iter()
            .map(|name| frame.numeric(name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = Vec::with_capacity(frame.n_rows());
        for row in 0..frame.n_rows() {
            let mut point = [0.0; 4];
            for (k, col) in cols.iter().enumerate() {
                let value = col[row];
                if !value.is_finite() {
                    return Err(PreprocessingError::InvalidData {
                        column: names[k].to_string(),
                        row,
                        reason: format!("coordinate must be finite, got {value}"),
                    });
                }
                point[k] = value;
            }
            out.push(haversine_km(point[0], point[1], point[2], point[3]));
        }
        Ok(Tensor2D::from_column(out))
    }
}

/// Computes the haversine distance (km) for each row: one output column.
///
/// Stateless: `fit` only checks the coordinate columns exist.
///
/// # Example
/// ```
/// use taxifare::backend::CpuBackend;
/// use taxifare::dataset::{Column, RideFrame};
/// use taxifare::preprocessing::{DistanceTransformer, StatelessTransformer};
///
/// let frame = RideFrame::new()
///     .with_column("pickup_latitude", Column::Numeric(vec![40.7]))
///     .unwrap()
///     .with_column("pickup_longitude", Column::Numeric(vec![-74.0]))
///     .unwrap()
///     .with_column("dropoff_latitude", Column::Numeric(vec![40.7]))
///     .unwrap()
///     .with_column("dropoff_longitude", Column::Numeric(vec![-74.0]))
///     .unwrap();
///
/// let d = DistanceTransformer::<CpuBackend>::new().transform_direct(&frame).unwrap();
/// assert_eq!(d.to_vec(), vec![0.0]);
/// ```
#[derive(Clone, Debug)]
pub struct DistanceTransformer<B: Backend> {
    columns: CoordinateColumns,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for DistanceTransformer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> DistanceTransformer<B> {
    /// Reads the default `pickup_*` / `dropoff_*` columns.
    pub fn new() -> Self {
        Self::with_columns(CoordinateColumns::default())
    }

    pub fn with_columns(columns: CoordinateColumns) -> Self {
        Self {
            columns,
            _backend: PhantomData,
        }
    }

    pub fn columns(&self) -> &CoordinateColumns {
        &self.columns
    }
}

impl<B: Backend> Transformer<B> for DistanceTransformer<B> {
    type Input = RideFrame;
    type Output = Tensor2D<B>;
    type Fitted = FittedDistanceTransformer<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        for name in self.columns.names() {
            data.numeric(name)?;
        }
        Ok(FittedDistanceTransformer {
            columns: self.columns.clone(),
            _backend: PhantomData,
        })
    }
}

impl<B: Backend> StatelessTransformer<B> for DistanceTransformer<B> {
    fn transform_direct(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.columns.distances(data)
    }
}

/// Fitted form of [`DistanceTransformer`]; holds only the column names.
#[derive(Clone, Debug)]
pub struct FittedDistanceTransformer<B: Backend> {
    columns: CoordinateColumns,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedTransformer<B> for FittedDistanceTransformer<B> {
    type Input = RideFrame;
    type Output = Tensor2D<B>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.columns.distances(data)
    }

    fn n_features_in(&self) -> usize {
        4
    }

    fn n_features_out(&self) -> usize {
        1
    }
}
