//! Error types for preprocessing operations.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for preprocessing operations.
#[derive(Debug, Error)]
pub enum PreprocessingError {
    /// Invalid or missing configuration value.
    #[error("Invalid configuration `{key}`: {reason}")]
    Config { key: String, reason: String },

    /// Expected columns are absent from the input table.
    #[error(
        "Missing expected columns. Numeric missing: {missing_numeric:?}; \
         Categorical missing: {missing_categorical:?}"
    )]
    Schema {
        missing_numeric: Vec<String>,
        missing_categorical: Vec<String>,
    },

    /// The target column is absent from the input table.
    #[error("Target column `{0}` not found in bronze data")]
    MissingTarget(String),

    /// A single column required by a fitted transform is absent.
    #[error("Column `{0}` not found")]
    ColumnNotFound(String),

    /// A column cannot be summarised (e.g. every value is missing).
    #[error("Data quality error in column `{column}`: {reason}")]
    DataQuality { column: String, reason: String },

    /// A zero variance or zero range column breaks a scaling strategy.
    #[error("Degenerate column `{column}`: {statistic} is zero")]
    DegenerateColumn {
        column: String,
        statistic: &'static str,
    },

    /// A fitted transform was applied to a table with different columns.
    #[error("Feature mismatch: expected {expected:?}, got {got:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },

    /// A table could not be assembled (ragged or duplicate columns).
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Source unreadable or destination unwritable.
    #[error("I/O error on {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Parquet encoding or decoding error.
    #[error("Parquet error: {0}")]
    Parquet(#[from] polars::prelude::PolarsError),
}

/// Coarse classification of a [`PreprocessingError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Schema,
    DataQuality,
    DegenerateColumn,
    Io,
}

impl PreprocessingError {
    /// Which category of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PreprocessingError::Config { .. } => ErrorKind::Config,
            PreprocessingError::Schema { .. }
            | PreprocessingError::MissingTarget(_)
            | PreprocessingError::ColumnNotFound(_)
            | PreprocessingError::FeatureMismatch { .. } => ErrorKind::Schema,
            PreprocessingError::DataQuality { .. } | PreprocessingError::InvalidTable(_) => {
                ErrorKind::DataQuality
            }
            PreprocessingError::DegenerateColumn { .. } => ErrorKind::DegenerateColumn,
            PreprocessingError::Io { .. }
            | PreprocessingError::Serialization(_)
            | PreprocessingError::Parquet(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        PreprocessingError::Config {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        PreprocessingError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for PreprocessingError {
    fn from(err: std::io::Error) -> Self {
        PreprocessingError::io(PathBuf::new(), err)
    }
}

impl From<bincode::Error> for PreprocessingError {
    fn from(err: bincode::Error) -> Self {
        PreprocessingError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for PreprocessingError {
    fn from(err: serde_json::Error) -> Self {
        PreprocessingError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for PreprocessingError {
    fn from(err: csv::Error) -> Self {
        PreprocessingError::io(PathBuf::new(), err)
    }
}
