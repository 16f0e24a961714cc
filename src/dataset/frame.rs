//! Column-oriented ride table.
//!
//! [`RideFrame`] is what the feature pipeline consumes: named columns, each
//! either numeric (`f64`, NaN for missing) or text (optional strings), all of
//! the same length.

use super::record::{columns, RideRecord};
use crate::preprocessing::PreprocessingError;

/// One column of a [`RideFrame`].
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Text(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn select_rows(&self, indices: &[usize]) -> Self {
        match self {
            Column::Numeric(v) => Column::Numeric(indices.iter().map(|&i| v[i]).collect()),
            Column::Text(v) => Column::Text(indices.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

/// A table of equally long named columns, in insertion order.
///
/// # Example
/// ```
/// use taxifare::dataset::{Column, RideFrame};
///
/// let frame = RideFrame::new()
///     .with_column("fare_amount", Column::Numeric(vec![7.5, 12.0]))
///     .unwrap()
///     .with_column("pickup_latitude", Column::Numeric(vec![40.7, 40.8]))
///     .unwrap();
///
/// let (x, y) = frame.split_target("fare_amount").unwrap();
/// assert_eq!(y, vec![7.5, 12.0]);
/// assert_eq!(x.column_names(), vec!["pickup_latitude"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RideFrame {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl RideFrame {
    /// Creates a frame with no columns and no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a frame with one column per [`RideRecord`] field.
    pub fn from_records(records: &[RideRecord]) -> Self {
        let numeric = |f: fn(&RideRecord) -> Option<f64>| {
            Column::Numeric(records.iter().map(|r| f(r).unwrap_or(f64::NAN)).collect())
        };

        let frame_columns = vec![
            (
                columns::KEY,
                Column::Text(records.iter().map(|r| r.key.clone()).collect()),
            ),
            (columns::FARE_AMOUNT, numeric(|r| r.fare_amount)),
            (
                columns::PICKUP_DATETIME,
                Column::Text(records.iter().map(|r| r.pickup_datetime.clone()).collect()),
            ),
            (columns::PICKUP_LONGITUDE, numeric(|r| r.pickup_longitude)),
            (columns::PICKUP_LATITUDE, numeric(|r| r.pickup_latitude)),
            (columns::DROPOFF_LONGITUDE, numeric(|r| r.dropoff_longitude)),
            (columns::DROPOFF_LATITUDE, numeric(|r| r.dropoff_latitude)),
            (
                columns::PASSENGER_COUNT,
                numeric(|r| r.passenger_count.map(|c| c as f64)),
            ),
        ];

        let (names, columns) = frame_columns
            .into_iter()
            .map(|(name, col)| (name.to_string(), col))
            .unzip();

        Self {
            names,
            columns,
            n_rows: records.len(),
        }
    }

    /// Appends a column, consuming and returning the frame.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<Self, PreprocessingError> {
        self.insert_column(name, column)?;
        Ok(self)
    }

    /// Appends a column.
    ///
    /// The first column fixes the row count; later columns must match it.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<(), PreprocessingError> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "duplicate column '{name}'"
            )));
        }
        if self.columns.is_empty() {
            self.n_rows = column.len();
        } else if column.len() != self.n_rows {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} rows", self.n_rows),
                got: format!("{} rows in column '{name}'", column.len()),
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Looks a column up by name.
    pub fn column(&self, name: &str) -> Result<&Column, PreprocessingError> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| PreprocessingError::MissingColumn(name.to_string()))
    }

    /// Borrows a numeric column.
    pub fn numeric(&self, name: &str) -> Result<&[f64], PreprocessingError> {
        match self.column(name)? {
            Column::Numeric(v) => Ok(v),
            Column::Text(_) => Err(PreprocessingError::ColumnType {
                column: name.to_string(),
                expected: "numeric",
            }),
        }
    }

    /// Borrows a text column.
    pub fn text(&self, name: &str) -> Result<&[Option<String>], PreprocessingError> {
        match self.column(name)? {
            Column::Text(v) => Ok(v),
            Column::Numeric(_) => Err(PreprocessingError::ColumnType {
                column: name.to_string(),
                expected: "text",
            }),
        }
    }

    /// Returns a copy of the frame without column `name`.
    pub fn drop_column(&self, name: &str) -> Result<Self, PreprocessingError> {
        self.column(name)?;
        let (names, columns) = self
            .names
            .iter()
            .zip(&self.columns)
            .filter(|(n, _)| n.as_str() != name)
            .map(|(n, c)| (n.clone(), c.clone()))
            .unzip();
        Ok(Self {
            names,
            columns,
            n_rows: self.n_rows,
        })
    }

    /// Returns a frame holding only `names`, in the order given.
    pub fn select(&self, names: &[&str]) -> Result<Self, PreprocessingError> {
        let mut out = Self {
            n_rows: self.n_rows,
            ..Self::default()
        };
        for &name in names {
            let column = self.column(name)?.clone();
            out.insert_column(name, column)?;
        }
        Ok(out)
    }

    /// Returns a frame holding the rows at `indices`, in that order.
    ///
    /// # Panics
    /// If an index is out of bounds.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select_rows(indices)).collect(),
            n_rows: indices.len(),
        }
    }

    /// Splits off a numeric target column: `(frame without target, target)`.
    pub fn split_target(&self, target: &str) -> Result<(Self, Vec<f64>), PreprocessingError> {
        let y = self.numeric(target)?.to_vec();
        Ok((self.drop_column(target)?, y))
    }
}
