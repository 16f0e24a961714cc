//! Trains the fare model on a CSV of rides and prints validation RMSE.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use taxifare::config::TrainConfig;
use taxifare::dataset::{
    clean_data, columns, ensure_non_empty, get_data, train_test_split, RideFrame,
};
use taxifare::logging::{init_logging, LogConfig};
use taxifare::{CpuBackend, Trainer};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "taxifare",
    version,
    about = "Train a linear taxi-fare model and report validation RMSE"
)]
struct Cli {
    /// TOML file with training settings; flags below override it.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// CSV path or http(s) URL of the ride data.
    #[arg(long, value_name = "SOURCE")]
    source: Option<String>,

    /// Maximum number of rows to read.
    #[arg(long = "rows", value_name = "N")]
    row_limit: Option<usize>,

    /// Share of cleaned rows held out for validation.
    #[arg(long, value_name = "FRACTION")]
    test_fraction: Option<f64>,

    /// IANA zone used for hour/weekday/month/year features.
    #[arg(long, value_name = "TZ")]
    timezone: Option<String>,

    #[arg(long)]
    seed: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn train_config(&self) -> Result<TrainConfig> {
        let mut config = match &self.config {
            Some(path) => TrainConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => TrainConfig::default(),
        };
        if let Some(source) = &self.source {
            config.source = source.clone();
        }
        if let Some(rows) = self.row_limit {
            config.row_limit = rows;
        }
        if let Some(fraction) = self.test_fraction {
            config.test_fraction = fraction;
        }
        if let Some(timezone) = &self.timezone {
            config.timezone = timezone.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.validate().context("invalid training settings")?;
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<f64> {
    let config = cli.train_config()?;

    let records = get_data(&config.source, config.row_limit)
        .with_context(|| format!("failed to read rides from {}", config.source))?;
    let records = clean_data(records);
    ensure_non_empty(&records)?;

    let (x, y) = RideFrame::from_records(&records).split_target(columns::FARE_AMOUNT)?;
    let split = train_test_split(&x, &y, config.test_fraction, config.seed)?;
    info!(
        train = split.y_train.len(),
        test = split.y_test.len(),
        "split rides"
    );

    let mut trainer = Trainer::<CpuBackend>::new(split.x_train, split.y_train, config)?;
    trainer.run().context("training failed")?;
    let rmse = trainer
        .evaluate(&split.x_test, &split.y_test)
        .context("evaluation failed")?;
    Ok(rmse)
}

fn main() {
    let cli = Cli::parse();
    let log_config = LogConfig::from_verbosity(cli.verbose).with_ansi(io::stderr().is_terminal());
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    match run(&cli) {
        Ok(rmse) => println!("RMSE = {rmse}"),
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    }
}
