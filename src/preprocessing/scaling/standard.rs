//! Standard Scaler (Z-score normalization).
//!
//! Transforms numeric columns by removing the mean and scaling to unit variance.
//!
//! The standard score of a sample `x` is calculated as:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the mean of the fitting samples and `s` is their population
//! standard deviation (ddof = 0).

use super::{apply_affine, DegeneratePolicy};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::table::Table;
use log::warn;
use ndarray::Axis;
use serde::{Deserialize, Serialize};

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Scaled columns, in fit order.
    pub columns: Vec<String>,
    /// Mean of each column.
    pub mean: Vec<f64>,
    /// Divisor of each column: the population std, or 1 for a constant column.
    pub scale: Vec<f64>,
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug)]
pub struct StandardScaler {
    columns: Vec<String>,
    policy: DegeneratePolicy,
}

impl StandardScaler {
    /// Create a new StandardScaler over `columns`.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            policy: DegeneratePolicy::default(),
        }
    }

    /// Set the zero-variance column policy.
    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Transformer for StandardScaler {
    type Params = StandardScalerParams;
    type Fitted = FittedStandardScaler;

    fn fit(&self, table: &Table) -> Result<Self::Fitted, PreprocessingError> {
        let data = table.numeric_matrix(&self.columns)?;

        let mean = data.mean_axis(Axis(0)).ok_or_else(|| PreprocessingError::DataQuality {
            column: self.columns.join(", "),
            reason: "cannot fit StandardScaler on an empty table".to_string(),
        })?;
        let std = data.std_axis(Axis(0), 0.0);
        let n_samples = data.nrows() as f64;

        let mut scale = Vec::with_capacity(self.columns.len());
        for (j, name) in self.columns.iter().enumerate() {
            let constant = is_constant_variance(std[j] * std[j], mean[j], n_samples);
            let s = self
                .policy
                .resolve(name, std[j], constant, "standard deviation")?;
            if s != std[j] {
                warn!("column `{name}` has zero variance, using a scale of 1");
            }
            scale.push(s);
        }

        Ok(FittedStandardScaler {
            columns: self.columns.clone(),
            mean: mean.to_vec(),
            scale,
        })
    }
}

/// Whether a variance is zero up to the rounding error of computing it from
/// `n_samples` values around `mean`. Relative, so tiny but genuine spreads
/// still scale to unit variance.
fn is_constant_variance(var: f64, mean: f64, n_samples: f64) -> bool {
    let upper = n_samples * f64::EPSILON * var + (n_samples * mean * f64::EPSILON).powi(2);
    var <= upper
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedStandardScaler {
    columns: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl FittedStandardScaler {
    /// Get the mean values for each column.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Get the divisor for each column.
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Params = StandardScalerParams;

    fn transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        apply_affine(table, &self.columns, &self.mean, &self.scale)
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            columns: self.columns.clone(),
            mean: self.mean.clone(),
            scale: self.scale.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let n = params.columns.len();
        if params.mean.len() != n || params.scale.len() != n {
            return Err(PreprocessingError::Serialization(format!(
                "standard scaler has {} columns, {} means and {} scales",
                n,
                params.mean.len(),
                params.scale.len()
            )));
        }
        Ok(Self {
            columns: params.columns,
            mean: params.mean,
            scale: params.scale,
        })
    }

    fn feature_names_in(&self) -> &[String] {
        &self.columns
    }
}
