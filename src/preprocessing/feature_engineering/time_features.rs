//! Calendar features from a timezone-aware pickup timestamp.

use crate::backend::{Backend, Tensor2D};
use crate::dataset::{columns, RideFrame};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, StatelessTransformer, Transformer};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Timelike};
use chrono_tz::Tz;
use std::marker::PhantomData;

/// Timezone the calendar features are computed in unless configured otherwise.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

/// Number of output columns: hour, weekday, month, year.
pub const N_TIME_FEATURES: usize = 4;

/// Parses a timestamp that carries its own UTC offset.
///
/// Accepted forms:
/// - `2013-07-02 19:54:00 UTC` (fractional seconds allowed)
/// - RFC 3339: `2013-07-02T19:54:00Z`, `2013-07-02T21:54:00+02:00`
/// - `2013-07-02 19:54:00 +0000`
///
/// ```
/// use taxifare::preprocessing::parse_timestamp;
///
/// let a = parse_timestamp("2013-07-02 19:54:00 UTC").unwrap();
/// let b = parse_timestamp("2013-07-02T21:54:00+02:00").unwrap();
/// assert_eq!(a, b);
/// assert!(parse_timestamp("2013-07-02 19:54:00").is_err());
/// ```
pub fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    let text = text.trim();
    if let Some(naive) = text.strip_suffix(" UTC") {
        return NaiveDateTime::parse_from_str(naive, "%Y-%m-%d %H:%M:%S%.f")
            .map(|dt| dt.and_utc().fixed_offset());
    }
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f %z"))
}

/// Calendar components of one instant in a given timezone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarFeatures {
    /// 0..=23
    pub hour: u32,
    /// 0..=6, Monday = 0
    pub weekday: u32,
    /// 1..=12
    pub month: u32,
    pub year: i32,
}

impl CalendarFeatures {
    pub fn at(instant: &DateTime<FixedOffset>, tz: Tz) -> Self {
        let local = instant.with_timezone(&tz);
        Self {
            hour: local.hour(),
            weekday: local.weekday().num_days_from_monday(),
            month: local.month(),
            year: local.year(),
        }
    }

    fn to_row(self) -> [f64; N_TIME_FEATURES] {
        [
            f64::from(self.hour),
            f64::from(self.weekday),
            f64::from(self.month),
            f64::from(self.year),
        ]
    }
}

/// Decomposes a timestamp column into `[hour, weekday, month, year]`.
///
/// # Example
/// ```
/// use taxifare::backend::CpuBackend;
/// use taxifare::dataset::{Column, RideFrame};
/// use taxifare::preprocessing::{StatelessTransformer, TimeFeaturesEncoder};
///
/// let frame = RideFrame::new()
///     .with_column(
///         "pickup_datetime",
///         Column::Text(vec![Some("2013-07-02 19:54:00 UTC".to_string())]),
///     )
///     .unwrap();
///
/// let enc = TimeFeaturesEncoder::<CpuBackend>::new("pickup_datetime");
/// // 19:54 UTC is 15:54 EDT, a Tuesday
/// assert_eq!(enc.transform_direct(&frame).unwrap().to_vec(), vec![15.0, 1.0, 7.0, 2013.0]);
/// ```
#[derive(Clone, Debug)]
pub struct TimeFeaturesEncoder<B: Backend> {
    column: String,
    timezone: Tz,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for TimeFeaturesEncoder<B> {
    fn default() -> Self {
        Self::new(columns::PICKUP_DATETIME)
    }
}

impl<B: Backend> TimeFeaturesEncoder<B> {
    /// Reads `column`, localising to `America/New_York`.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            timezone: DEFAULT_TIMEZONE,
            _backend: PhantomData,
        }
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Sets the target timezone from an IANA name such as `Europe/Paris`.
    pub fn with_timezone_name(self, name: &str) -> Result<Self, PreprocessingError> {
        let tz: Tz = name.parse().map_err(|_| {
            PreprocessingError::InvalidParameter(format!("unknown timezone '{name}'"))
        })?;
        Ok(self.with_timezone(tz))
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

fn encode<B: Backend>(
    column: &str,
    timezone: Tz,
    frame: &RideFrame,
) -> Result<Tensor2D<B>, PreprocessingError> {
    let values = frame.text(column)?;
    let mut out = Vec::with_capacity(values.len() * N_TIME_FEATURES);
    for (row, value) in values.iter().enumerate() {
        let text = value.as_deref().ok_or_else(|| PreprocessingError::InvalidTimestamp {
            row,
            value: String::new(),
            reason: "missing timestamp".to_string(),
        })?;
        let instant = parse_timestamp(text).map_err(|e| PreprocessingError::InvalidTimestamp {
            row,
            value: text.to_string(),
            reason: format!("expected a timezone-aware timestamp: {e}"),
        })?;
        out.extend(CalendarFeatures::at(&instant, timezone).to_row());
    }
    Ok(Tensor2D::new(out, values.len(), N_TIME_FEATURES))
}

impl<B: Backend> Transformer<B> for TimeFeaturesEncoder<B> {
    type Input = RideFrame;
    type Output = Tensor2D<B>;
    type Fitted = FittedTimeFeaturesEncoder<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        data.text(&self.column)?;
        Ok(FittedTimeFeaturesEncoder {
            column: self.column.clone(),
            timezone: self.timezone,
            _backend: PhantomData,
        })
    }
}

impl<B: Backend> StatelessTransformer<B> for TimeFeaturesEncoder<B> {
    fn transform_direct(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        encode(&self.column, self.timezone, data)
    }
}

/// Fitted form of [`TimeFeaturesEncoder`].
#[derive(Clone, Debug)]
pub struct FittedTimeFeaturesEncoder<B: Backend> {
    column: String,
    timezone: Tz,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedTransformer<B> for FittedTimeFeaturesEncoder<B> {
    type Input = RideFrame;
    type Output = Tensor2D<B>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        encode(&self.column, self.timezone, data)
    }

    fn n_features_in(&self) -> usize {
        1
    }

    fn n_features_out(&self) -> usize {
        N_TIME_FEATURES
    }
}
