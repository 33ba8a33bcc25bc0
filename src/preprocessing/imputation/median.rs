//! Median Imputer.
//!
//! Fills missing numeric values with the per-column median computed over the
//! observed (non-missing) values only.
//!
//! Integer columns keep their integer type when the median is integral and
//! are promoted to `float64` when it is not, so `[20, 25, _, 40, 50]` becomes
//! `[20.0, 25.0, 32.5, 40.0, 50.0]`. Columns without missing values are
//! returned untouched, which makes a second pass a no-op.
//!
//! # Example
//! ```ignore
//! use credit_risk_features::preprocessing::{MedianImputer, Transformer, FittedTransformer};
//!
//! let imputer = MedianImputer::new(schema.numeric_cols().to_vec());
//! let fitted = imputer.fit(&bronze)?;
//! let imputed = fitted.transform(&bronze)?;
//! ```

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{check_columns, FittedTransformer, Transformer};
use crate::table::{Column, ColumnData, Table};
use log::debug;
use serde::{Deserialize, Serialize};

/// Serializable parameters for a fitted MedianImputer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MedianImputerParams {
    /// Columns the imputer applies to, in fit order.
    pub columns: Vec<String>,
    /// Median of the observed values of each column. `None` for an empty column.
    pub medians: Vec<Option<f64>>,
}

/// MedianImputer transformer (unfitted).
#[derive(Clone, Debug)]
pub struct MedianImputer {
    columns: Vec<String>,
}

impl MedianImputer {
    /// Create an imputer over the given numeric columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

/// Median of `values`, or `None` when empty.
fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 0 {
        Some((values[n / 2 - 1] + values[n / 2]) / 2.0)
    } else {
        Some(values[n / 2])
    }
}

impl Transformer for MedianImputer {
    type Params = MedianImputerParams;
    type Fitted = FittedMedianImputer;

    fn fit(&self, table: &Table) -> Result<Self::Fitted, PreprocessingError> {
        let mut medians = Vec::with_capacity(self.columns.len());

        for name in &self.columns {
            let column = table.require(name)?;
            let observed: Vec<f64> = column.to_f64()?.into_iter().flatten().collect();

            if observed.is_empty() && !column.is_empty() {
                return Err(PreprocessingError::DataQuality {
                    column: name.clone(),
                    reason: "all values are missing, median is undefined".to_string(),
                });
            }
            medians.push(median(observed));
        }

        Ok(FittedMedianImputer {
            columns: self.columns.clone(),
            medians,
        })
    }
}

/// Fitted MedianImputer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedMedianImputer {
    columns: Vec<String>,
    medians: Vec<Option<f64>>,
}

impl FittedMedianImputer {
    /// Get the fill value for each column.
    pub fn medians(&self) -> &[Option<f64>] {
        &self.medians
    }

    fn fill(column: &Column, value: f64) -> Column {
        let data = match column.data() {
            ColumnData::Int(v) if value.fract() == 0.0 => {
                ColumnData::Int(v.iter().map(|x| Some(x.unwrap_or(value as i64))).collect())
            }
            ColumnData::Int(v) => ColumnData::Float(
                v.iter()
                    .map(|x| Some(x.map(|x| x as f64).unwrap_or(value)))
                    .collect(),
            ),
            ColumnData::Float(v) => ColumnData::Float(v.iter().map(|x| Some(x.unwrap_or(value))).collect()),
            ColumnData::Float32(v) => {
                ColumnData::Float32(v.iter().map(|x| Some(x.unwrap_or(value as f32))).collect())
            }
            ColumnData::Category(v) => ColumnData::Category(v.clone()),
        };
        Column::new(column.name(), data)
    }
}

impl FittedTransformer for FittedMedianImputer {
    type Params = MedianImputerParams;

    fn transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        check_columns(table, &self.columns)?;

        let mut result = table.clone();
        for (name, median) in self.columns.iter().zip(&self.medians) {
            let column = table.require(name)?;
            // Rejects category columns before any fill is attempted.
            column.to_f64()?;
            if !column.has_missing() {
                continue;
            }
            let value = median.ok_or_else(|| PreprocessingError::DataQuality {
                column: name.clone(),
                reason: "no median was learned for this column".to_string(),
            })?;
            debug!(
                "imputing {} missing values in `{}` with median {}",
                column.null_count(),
                name,
                value
            );
            result = result.replace_column(Self::fill(column, value))?;
        }
        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        MedianImputerParams {
            columns: self.columns.clone(),
            medians: self.medians.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.columns.len() != params.medians.len() {
            return Err(PreprocessingError::Serialization(format!(
                "imputer has {} columns but {} medians",
                params.columns.len(),
                params.medians.len()
            )));
        }
        Ok(Self {
            columns: params.columns,
            medians: params.medians,
        })
    }

    fn feature_names_in(&self) -> &[String] {
        &self.columns
    }
}

/// Fit a [`MedianImputer`] on `table` and apply it in one step.
pub fn impute_numerics(table: &Table, columns: &[String]) -> Result<Table, PreprocessingError> {
    let (imputed, _) = MedianImputer::new(columns.to_vec()).fit_transform(table)?;
    Ok(imputed)
}
