//! Logging setup for the `taxifare` binary, built on `tracing-subscriber`.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary (or to the embedding application).
//!
//! - `warn`: rows dropped during cleaning
//! - `info`: run milestones (rows loaded, pipeline fitted, RMSE)
//! - `debug`: per-fit statistics and solver epochs

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    /// Include the module path in each line.
    pub with_target: bool,
    pub with_ansi: bool,
    pub with_timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_target: false,
            with_ansi: true,
            with_timestamps: false,
        }
    }
}

impl LogConfig {
    /// Maps a `-v` count to a level: none is warn, then info, debug, trace.
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }

    #[must_use]
    pub fn with_timestamps(mut self, enable: bool) -> Self {
        self.with_timestamps = enable;
        self
    }
}

/// Installs the global subscriber, writing to stderr.
///
/// # Errors
/// If a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target);
    let registry = tracing_subscriber::registry().with(build_env_filter(config.level));

    if config.with_timestamps {
        registry.with(layer).try_init()
    } else {
        registry.with(layer.without_time()).try_init()
    }
}

/// `RUST_LOG` wins when set; otherwise this crate logs at `level` and
/// everything else at warn.
fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.as_str().to_lowercase();
        EnvFilter::new(format!("warn,taxifare={level}"))
    })
}
