//! Error types for preprocessing operations.

use thiserror::Error;

/// Error type for frame access and transformer fit/transform.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PreprocessingError {
    /// Shape mismatch between expected and actual tensor dimensions.
    #[error("Invalid shape: expected {expected}, got {got}")]
    InvalidShape { expected: String, got: String },

    /// A cell holds a value the transformer cannot use (NaN, infinite, missing).
    #[error("Invalid data in column '{column}' at row {row}: {reason}")]
    InvalidData {
        column: String,
        row: usize,
        reason: String,
    },

    /// A timestamp cell is missing, unparseable, or carries no UTC offset.
    #[error("Invalid timestamp at row {row} ({value:?}): {reason}")]
    InvalidTimestamp {
        row: usize,
        value: String,
        reason: String,
    },

    /// A required column is absent from the frame.
    #[error("Missing column '{0}'")]
    MissingColumn(String),

    /// A column exists but holds the wrong kind of values.
    #[error("Column '{column}' is not a {expected} column")]
    ColumnType {
        column: String,
        expected: &'static str,
    },

    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Feature dimension mismatch.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },

    /// Invalid hyperparameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Category not seen during fit, under `HandleUnknown::Error`.
    #[error("Unknown category {value} in feature {feature}")]
    UnknownCategory { feature: usize, value: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_shape() {
        let err = PreprocessingError::InvalidShape {
            expected: "(2, 3)".to_string(),
            got: "(3, 2)".to_string(),
        };
        assert!(err.to_string().contains("Invalid shape"));
    }

    #[test]
    fn test_error_display_invalid_data_names_column_and_row() {
        let err = PreprocessingError::InvalidData {
            column: "pickup_latitude".to_string(),
            row: 7,
            reason: "value is NaN".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("pickup_latitude"));
        assert!(msg.contains("row 7"));
    }

    #[test]
    fn test_error_display_invalid_timestamp() {
        let err = PreprocessingError::InvalidTimestamp {
            row: 2,
            value: "yesterday".to_string(),
            reason: "unrecognised format".to_string(),
        };
        assert!(err.to_string().contains("\"yesterday\""));
    }

    #[test]
    fn test_error_display_feature_mismatch() {
        let err = PreprocessingError::FeatureMismatch {
            expected_features: 5,
            got_features: 3,
        };
        assert!(err.to_string().contains("Feature mismatch"));
    }

    #[test]
    fn test_error_display_unknown_category() {
        let err = PreprocessingError::UnknownCategory {
            feature: 1,
            value: 9,
        };
        assert_eq!(err.to_string(), "Unknown category 9 in feature 1");
    }

    #[test]
    fn test_error_is_std_error() {
        let err = PreprocessingError::MissingColumn("key".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
