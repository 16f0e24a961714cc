//! # taxifare
//!
//! Predicts New York taxi fares with a linear model on top of a small,
//! type-safe feature pipeline.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: transformers and models carry their training
//!   state in the type system (`Unfitted` vs `Fitted`), so `transform` or
//!   `predict` on something untrained does not compile.
//! - **Fit on training rows only**: scaler statistics, one-hot vocabularies and
//!   weights are learned in `fit` and only read afterwards.
//! - **Backend Agnosticism**: all matrix work goes through the `Backend` trait
//!   (`CpuBackend`, `NdarrayBackend`).
//!
//! ## Quick Start
//!
//! ```rust
//! use taxifare::config::TrainConfig;
//! use taxifare::dataset::{columns, RideFrame, RideRecord};
//! use taxifare::trainer::Trainer;
//!
//! let ride = |when: &str, lat: f64, fare: f64| RideRecord {
//!     key: None,
//!     fare_amount: Some(fare),
//!     pickup_datetime: Some(when.to_string()),
//!     pickup_longitude: Some(-73.98),
//!     pickup_latitude: Some(40.74),
//!     dropoff_longitude: Some(-73.98),
//!     dropoff_latitude: Some(lat),
//!     passenger_count: Some(1),
//! };
//! let records = vec![
//!     ride("2013-07-02 19:54:00 UTC", 40.75, 5.5),
//!     ride("2013-07-02 20:10:00 UTC", 40.78, 9.0),
//!     ride("2013-07-02 21:30:00 UTC", 40.81, 12.5),
//! ];
//! let (x, y) = RideFrame::from_records(&records)
//!     .split_target(columns::FARE_AMOUNT)
//!     .unwrap();
//!
//! let mut trainer: Trainer = Trainer::new(x.clone(), y.clone(), TrainConfig::default()).unwrap();
//! trainer.run().unwrap();
//! let rmse = trainer.evaluate(&x, &y).unwrap();
//! assert!(rmse.is_finite() && rmse >= 0.0);
//! ```
//!
//! ## Module Structure
//!
//! - `backend`: tensor abstractions and computation primitives
//! - `dataset`: ride records, the column frame, loading, cleaning, splitting
//! - `preprocessing`: transformers, `Pipeline`, `ColumnTransformer`
//! - `features`: the fare feature pipeline
//! - `model`, `loss`, `optimizer`, `solver`: the linear head and its training loop
//! - `pipeline`: feature pipeline and linear head fitted together
//! - `trainer`: `set_pipeline` / `run` / `evaluate`
//! - `metrics`: RMSE, MSE, MAE

pub mod backend;

/// Ride records, the column frame, and dataset abstractions.
pub mod dataset;

/// Data preprocessing transformers.
pub mod preprocessing;

pub mod features;

/// Differentiable loss functions for model training.
pub mod loss;

/// Models with compile-time state safety.
pub mod model;

/// Parameter update rules.
pub mod optimizer;

pub mod solver;

pub mod pipeline;

pub mod trainer;

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

pub use backend::{Backend, CpuBackend, ScalarOps, Tensor1D, Tensor2D};
pub use config::TrainConfig;
pub use error::{FareError, Result};
pub use trainer::Trainer;
