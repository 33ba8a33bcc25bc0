//! Scaling transformers for numeric feature normalization.
//!
//! | Transformer | Description |
//! |-------------|-------------|
//! | [`StandardScaler`] | Z-score normalization with population std (mean=0, std=1) |
//! | [`MinMaxScaler`] | Map the observed range to [0, 1] |
//!
//! The strategy is chosen once from a [`ScalerKind`] and wrapped in the
//! closed [`Scaler`] / [`FittedScaler`] sum types, so the pipeline never
//! branches on a scaler name after configuration.
//!
//! Scaled columns are stored as `float32`. This precision loss is part of
//! the Silver output contract.
//!
//! # Example
//!
//! ```ignore
//! use credit_risk_features::preprocessing::{Scaler, ScalerKind, Transformer, FittedTransformer};
//!
//! let scaler = Scaler::new(ScalerKind::Standard, schema.numeric_cols().to_vec());
//! let fitted = scaler.fit(&imputed)?;
//! let scaled = fitted.transform(&imputed)?;
//! ```

pub mod minmax;
pub mod standard;

pub use minmax::{FittedMinMaxScaler, MinMaxScaler, MinMaxScalerParams};
pub use standard::{FittedStandardScaler, StandardScaler, StandardScalerParams};

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{check_columns, FittedTransformer, Transformer};
use crate::table::{Column, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which scaling strategy to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalerKind {
    #[default]
    Standard,
    MinMax,
}

impl FromStr for ScalerKind {
    type Err = PreprocessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(ScalerKind::Standard),
            "minmax" => Ok(ScalerKind::MinMax),
            other => Err(PreprocessingError::config(
                "scaler",
                format!("scaler must be 'standard' or 'minmax', got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for ScalerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalerKind::Standard => f.write_str("standard"),
            ScalerKind::MinMax => f.write_str("minmax"),
        }
    }
}

/// What to do with a column whose spread (std or range) is zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegeneratePolicy {
    /// Use a scale of 1 for the column.
    #[default]
    UnitScale,
    /// Fail with [`PreprocessingError::DegenerateColumn`].
    Fail,
}

impl DegeneratePolicy {
    /// Resolve the divisor for a column with the given spread.
    ///
    /// `degenerate` is the caller's verdict on whether `spread` is zero up to
    /// rounding; each scaler measures that against its own statistic.
    pub(crate) fn resolve(
        self,
        column: &str,
        spread: f64,
        degenerate: bool,
        statistic: &'static str,
    ) -> Result<f64, PreprocessingError> {
        if !degenerate {
            return Ok(spread);
        }
        match self {
            DegeneratePolicy::UnitScale => Ok(1.0),
            DegeneratePolicy::Fail => Err(PreprocessingError::DegenerateColumn {
                column: column.to_string(),
                statistic,
            }),
        }
    }
}

/// Unfitted scaler, one of the supported strategies.
#[derive(Clone, Debug)]
pub enum Scaler {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl Scaler {
    /// Create the scaler selected by `kind` over `columns`.
    pub fn new(kind: ScalerKind, columns: Vec<String>) -> Self {
        match kind {
            ScalerKind::Standard => Scaler::Standard(StandardScaler::new(columns)),
            ScalerKind::MinMax => Scaler::MinMax(MinMaxScaler::new(columns)),
        }
    }

    /// Set the zero-spread column policy.
    pub fn with_degenerate_policy(self, policy: DegeneratePolicy) -> Self {
        match self {
            Scaler::Standard(s) => Scaler::Standard(s.with_degenerate_policy(policy)),
            Scaler::MinMax(s) => Scaler::MinMax(s.with_degenerate_policy(policy)),
        }
    }

    pub fn kind(&self) -> ScalerKind {
        match self {
            Scaler::Standard(_) => ScalerKind::Standard,
            Scaler::MinMax(_) => ScalerKind::MinMax,
        }
    }
}

/// Serializable parameters of a fitted scaler, tagged by strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ScalerParams {
    Standard(StandardScalerParams),
    MinMax(MinMaxScalerParams),
}

/// Fitted scaler, one of the supported strategies.
#[derive(Clone, Debug)]
pub enum FittedScaler {
    Standard(FittedStandardScaler),
    MinMax(FittedMinMaxScaler),
}

impl FittedScaler {
    pub fn kind(&self) -> ScalerKind {
        match self {
            FittedScaler::Standard(_) => ScalerKind::Standard,
            FittedScaler::MinMax(_) => ScalerKind::MinMax,
        }
    }
}

impl Transformer for Scaler {
    type Params = ScalerParams;
    type Fitted = FittedScaler;

    fn fit(&self, table: &Table) -> Result<Self::Fitted, PreprocessingError> {
        match self {
            Scaler::Standard(s) => s.fit(table).map(FittedScaler::Standard),
            Scaler::MinMax(s) => s.fit(table).map(FittedScaler::MinMax),
        }
    }
}

impl FittedTransformer for FittedScaler {
    type Params = ScalerParams;

    fn transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        match self {
            FittedScaler::Standard(s) => s.transform(table),
            FittedScaler::MinMax(s) => s.transform(table),
        }
    }

    fn extract_params(&self) -> Self::Params {
        match self {
            FittedScaler::Standard(s) => ScalerParams::Standard(s.extract_params()),
            FittedScaler::MinMax(s) => ScalerParams::MinMax(s.extract_params()),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        match params {
            ScalerParams::Standard(p) => FittedStandardScaler::from_params(p).map(FittedScaler::Standard),
            ScalerParams::MinMax(p) => FittedMinMaxScaler::from_params(p).map(FittedScaler::MinMax),
        }
    }

    fn feature_names_in(&self) -> &[String] {
        match self {
            FittedScaler::Standard(s) => s.feature_names_in(),
            FittedScaler::MinMax(s) => s.feature_names_in(),
        }
    }
}

/// Replace each of `columns` in place with `(x - center) / scale` stored as `float32`.
pub(crate) fn apply_affine(
    table: &Table,
    columns: &[String],
    center: &[f64],
    scale: &[f64],
) -> Result<Table, PreprocessingError> {
    check_columns(table, columns)?;
    let matrix = table.numeric_matrix(columns)?;

    let mut result = table.clone();
    for (j, name) in columns.iter().enumerate() {
        let values = matrix
            .column(j)
            .iter()
            .map(|&x| Some(((x - center[j]) / scale[j]) as f32))
            .collect();
        result = result.replace_column(Column::float32(name.as_str(), values))?;
    }
    Ok(result)
}

/// Fit `scaler` on `table` and apply it, returning the fitted state.
pub fn scale_numerics(
    table: &Table,
    scaler: &Scaler,
) -> Result<(Table, FittedScaler), PreprocessingError> {
    scaler.fit_transform(table)
}
