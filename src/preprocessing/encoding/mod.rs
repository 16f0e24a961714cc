//! Categorical feature encoding.
//!
//! Categories arrive as non-negative integers stored in `f64` tensor cells
//! (an hour, a weekday, a month, a year). The encoder learns the sorted set of
//! values per column and emits one indicator column per value.
//!
//! ```text
//! // Input: [[0], [1], [2]]  (3 samples, 1 categorical feature)
//! // Output: [[1,0,0], [0,1,0], [0,0,1]]  (3 samples, 3 binary features)
//! ```

mod one_hot;

pub use one_hot::{FittedOneHotEncoder, OneHotEncoder};

/// Strategy for handling unknown categories during transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HandleUnknown {
    /// Raise an error when unknown categories are encountered.
    #[default]
    Error,
    /// Encode unknown categories as an all-zero block.
    Ignore,
}
