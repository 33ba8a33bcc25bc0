//! MinMax Scaler.
//!
//! Maps each column's fit-time observed range onto `[0, 1]`:
//! ```text
//! x_scaled = (x - min) / (max - min)
//! ```
//! Values outside the fit-time range (only possible when replaying on new
//! data) fall outside `[0, 1]`; they are not clipped.

use super::{apply_affine, DegeneratePolicy};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::table::Table;
use log::warn;
use serde::{Deserialize, Serialize};

/// Serializable parameters for a fitted MinMaxScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScalerParams {
    pub columns: Vec<String>,
    /// Minimum value of each column.
    pub data_min: Vec<f64>,
    /// Maximum value of each column.
    pub data_max: Vec<f64>,
    /// Divisor of each column: the range, or 1 for a constant column.
    pub scale: Vec<f64>,
}

/// MinMaxScaler transformer (unfitted).
#[derive(Clone, Debug)]
pub struct MinMaxScaler {
    columns: Vec<String>,
    policy: DegeneratePolicy,
}

impl MinMaxScaler {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            policy: DegeneratePolicy::default(),
        }
    }

    /// Set the zero-range column policy.
    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Transformer for MinMaxScaler {
    type Params = MinMaxScalerParams;
    type Fitted = FittedMinMaxScaler;

    fn fit(&self, table: &Table) -> Result<Self::Fitted, PreprocessingError> {
        let data = table.numeric_matrix(&self.columns)?;
        if data.nrows() == 0 {
            return Err(PreprocessingError::DataQuality {
                column: self.columns.join(", "),
                reason: "cannot fit MinMaxScaler on an empty table".to_string(),
            });
        }

        let n_cols = self.columns.len();
        let mut data_min = Vec::with_capacity(n_cols);
        let mut data_max = Vec::with_capacity(n_cols);
        let mut scale = Vec::with_capacity(n_cols);

        for (j, name) in self.columns.iter().enumerate() {
            let col = data.column(j);
            let min = col.fold(f64::INFINITY, |a, &b| a.min(b));
            let max = col.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
            let range = max - min;

            let constant = range <= 10.0 * f64::EPSILON * max.abs().max(min.abs()).max(1.0);
            let s = self.policy.resolve(name, range, constant, "range")?;
            if s != range {
                warn!("column `{name}` is constant, using a scale of 1");
            }
            data_min.push(min);
            data_max.push(max);
            scale.push(s);
        }

        Ok(FittedMinMaxScaler {
            columns: self.columns.clone(),
            data_min,
            data_max,
            scale,
        })
    }
}

/// Fitted MinMaxScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedMinMaxScaler {
    columns: Vec<String>,
    data_min: Vec<f64>,
    data_max: Vec<f64>,
    scale: Vec<f64>,
}

impl FittedMinMaxScaler {
    pub fn data_min(&self) -> &[f64] {
        &self.data_min
    }

    pub fn data_max(&self) -> &[f64] {
        &self.data_max
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}

impl FittedTransformer for FittedMinMaxScaler {
    type Params = MinMaxScalerParams;

    fn transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        apply_affine(table, &self.columns, &self.data_min, &self.scale)
    }

    fn extract_params(&self) -> Self::Params {
        MinMaxScalerParams {
            columns: self.columns.clone(),
            data_min: self.data_min.clone(),
            data_max: self.data_max.clone(),
            scale: self.scale.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let n = params.columns.len();
        if params.data_min.len() != n || params.data_max.len() != n || params.scale.len() != n {
            return Err(PreprocessingError::Serialization(format!(
                "minmax scaler has {} columns but {} minima, {} maxima, {} scales",
                n,
                params.data_min.len(),
                params.data_max.len(),
                params.scale.len()
            )));
        }
        Ok(Self {
            columns: params.columns,
            data_min: params.data_min,
            data_max: params.data_max,
            scale: params.scale,
        })
    }

    fn feature_names_in(&self) -> &[String] {
        &self.columns
    }
}
