//! Feature scaling transformers.

mod standard;

pub use standard::{FittedStandardScaler, StandardScaler, StandardScalerConfig};
