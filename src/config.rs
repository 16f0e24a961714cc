//! Run configuration, loadable from TOML.
//!
//! ```toml
//! source = "data/train.csv"
//! row_limit = 1000
//! test_fraction = 0.15
//! timezone = "America/New_York"
//! seed = 42
//!
//! [solver]
//! method = "least_squares"  # or "gradient_descent"
//! learning_rate = 0.1
//! max_epochs = 5000
//! tol = 1e-9
//! ```
//!
//! Every key is optional; missing keys take the defaults above.

use crate::error::{FareError, Result};
use crate::solver::SolverConfig;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainConfig {
    /// CSV path or `http(s)://` URL.
    pub source: String,
    /// Maximum number of CSV rows to read.
    pub row_limit: usize,
    /// Share of cleaned rows held out for validation.
    pub test_fraction: f64,
    /// IANA name of the zone calendar features are computed in.
    pub timezone: String,
    /// Seed for the train/validation shuffle.
    pub seed: u64,
    pub solver: SolverConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            source: "data/train.csv".to_string(),
            row_limit: 1000,
            test_fraction: 0.15,
            timezone: "America/New_York".to_string(),
            seed: 42,
            solver: SolverConfig::default(),
        }
    }
}

impl TrainConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| FareError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Rejects values no run could use.
    pub fn validate(&self) -> Result<()> {
        if self.row_limit == 0 {
            return Err(FareError::Config("row_limit must be at least 1".into()));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(FareError::Config(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        self.tz()?;
        self.solver.validate()
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| FareError::Config(format!("unknown timezone '{}'", self.timezone)))
    }
}
