//! # credit-risk-features
//!
//! Feature engineering for the credit risk scoring dataset: turns the Bronze
//! table (12 raw columns) into a model-ready Silver table and exports the
//! fitted state needed to transform new applications identically.
//!
//! ## Core Design Principles
//!
//! - **Fit/Transform Separation**: every stateful stage learns its statistics
//!   once and replays them without recomputation.
//! - **Explicit Schema**: the expected column sets are a value passed through
//!   the pipeline, not process-wide state.
//! - **Closed Strategies**: the scaler is a sum type chosen once from the
//!   configuration.
//! - **All-or-Nothing Output**: the Silver table and the artifact bundle are
//!   either all written or not written at all.
//!
//! ## Quick Start
//!
//! ```no_run
//! use credit_risk_features::config::PreprocessConfig;
//! use credit_risk_features::preprocessing::run_preprocess;
//!
//! let cfg = PreprocessConfig::from_params("params.json").unwrap();
//! let run = run_preprocess(&cfg).unwrap();
//! println!("silver table at {}", run.output.display());
//! ```
//!
//! ## Module Structure
//!
//! - `table` - In-memory columnar `Table` every stage operates on
//! - `preprocessing` - Validation, imputation, encoding, scaling, expansion and orchestration
//! - `dataset` - Parquet and CSV readers, staged all-or-nothing writers
//! - `config` - `PreprocessConfig` loaded from a JSON params file
//! - `serialization` - Byte encoding of fitted parameters

pub mod config;
pub mod dataset;
pub mod preprocessing;
pub mod serialization;
pub mod table;

pub use config::PreprocessConfig;
pub use preprocessing::{FittedPreprocessor, PipelineError, PreprocessingError};
pub use table::{Column, ColumnData, ColumnKind, Table};
