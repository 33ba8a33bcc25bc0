//! Polynomial feature generation.
//!
//! Generates polynomial and interaction features from the numeric columns of
//! a table.

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{check_columns, FittedTransformer, Transformer};
use crate::table::{Column, Table};
use log::debug;
use serde::{Deserialize, Serialize};

/// PolynomialFeatures transformer for generating polynomial and interaction features.
///
/// Produces every monomial of the configured columns with total degree between
/// 1 and `degree`. There is no bias column. For input columns `[a, b]` the
/// degree-2 features are `[a, b, a^2, a b, b^2]`.
///
/// The configured columns are removed from the table and the expansion is
/// appended after the remaining columns. Products are computed in `f64` and
/// stored as `float32`.
///
/// # Example
/// ```ignore
/// use credit_risk_features::preprocessing::{PolynomialFeatures, Transformer, FittedTransformer};
///
/// let poly = PolynomialFeatures::new(vec!["age".into(), "income".into()], 2);
/// let fitted = poly.fit(&scaled)?;
/// assert_eq!(fitted.feature_names_out(), ["age", "income", "age^2", "age income", "income^2"]);
/// let expanded = fitted.transform(&scaled)?;
/// ```
#[derive(Clone, Debug)]
pub struct PolynomialFeatures {
    columns: Vec<String>,
    degree: usize,
}

impl PolynomialFeatures {
    pub fn new(columns: Vec<String>, degree: usize) -> Self {
        Self { columns, degree }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }
}

/// Serializable parameters for fitted PolynomialFeatures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolynomialFeaturesParams {
    /// Input columns, in expansion order.
    pub columns: Vec<String>,
    /// Maximum degree of polynomial features.
    pub degree: usize,
    /// Column indices multiplied together for each output feature.
    /// For example `[0]` is the first input, `[0, 0]` its square and
    /// `[0, 1]` the interaction of the first two inputs.
    pub combinations: Vec<Vec<usize>>,
    /// Output feature names, one per combination.
    pub feature_names: Vec<String>,
}

/// Fitted PolynomialFeatures ready for inference.
#[derive(Clone, Debug)]
pub struct FittedPolynomialFeatures {
    columns: Vec<String>,
    degree: usize,
    combinations: Vec<Vec<usize>>,
    feature_names: Vec<String>,
}

impl FittedPolynomialFeatures {
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Get the number of output features.
    pub fn n_features_out(&self) -> usize {
        self.combinations.len()
    }

    /// The expansion basis: output feature names in column order.
    pub fn feature_names_out(&self) -> &[String] {
        &self.feature_names
    }

    /// Exponent of every input column for each output feature.
    pub fn powers(&self) -> Vec<Vec<usize>> {
        self.combinations
            .iter()
            .map(|indices| {
                let mut powers = vec![0; self.columns.len()];
                for &idx in indices {
                    powers[idx] += 1;
                }
                powers
            })
            .collect()
    }
}

impl Transformer for PolynomialFeatures {
    type Params = PolynomialFeaturesParams;
    type Fitted = FittedPolynomialFeatures;

    fn fit(&self, table: &Table) -> Result<Self::Fitted, PreprocessingError> {
        if self.degree < 1 {
            return Err(PreprocessingError::config(
                "poly_degree",
                format!("must be a positive integer, got {}", self.degree),
            ));
        }
        for name in &self.columns {
            let column = table.require(name)?;
            if !column.kind().is_numeric() {
                return Err(PreprocessingError::DataQuality {
                    column: name.clone(),
                    reason: format!("cannot expand a {} column", column.kind()),
                });
            }
        }

        let combinations = generate_polynomial_combinations(self.columns.len(), self.degree);
        let feature_names = combinations
            .iter()
            .map(|indices| feature_name(&self.columns, indices))
            .collect();

        Ok(FittedPolynomialFeatures {
            columns: self.columns.clone(),
            degree: self.degree,
            combinations,
            feature_names,
        })
    }
}

impl FittedTransformer for FittedPolynomialFeatures {
    type Params = PolynomialFeaturesParams;

    fn transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        check_columns(table, &self.columns)?;
        let data = table.numeric_matrix(&self.columns)?;

        let mut expanded = Vec::with_capacity(self.n_features_out());
        for (indices, name) in self.combinations.iter().zip(&self.feature_names) {
            let values = data
                .rows()
                .into_iter()
                .map(|row| {
                    let product: f64 = indices.iter().map(|&idx| row[idx]).product();
                    Some(product as f32)
                })
                .collect();
            expanded.push(Column::float32(name.as_str(), values));
        }
        debug!(
            "expanded {} columns to {} features (degree {})",
            self.columns.len(),
            expanded.len(),
            self.degree
        );

        let mut columns = table.drop_columns(&self.columns).into_columns();
        columns.extend(expanded);
        Table::new(columns)
    }

    fn extract_params(&self) -> Self::Params {
        PolynomialFeaturesParams {
            columns: self.columns.clone(),
            degree: self.degree,
            combinations: self.combinations.clone(),
            feature_names: self.feature_names.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.combinations.len() != params.feature_names.len() {
            return Err(PreprocessingError::Serialization(format!(
                "polynomial basis has {} combinations but {} names",
                params.combinations.len(),
                params.feature_names.len()
            )));
        }
        let n_in = params.columns.len();
        if params.combinations.iter().flatten().any(|&idx| idx >= n_in) {
            return Err(PreprocessingError::Serialization(format!(
                "polynomial basis references a column index beyond {n_in} inputs"
            )));
        }
        Ok(FittedPolynomialFeatures {
            columns: params.columns,
            degree: params.degree,
            combinations: params.combinations,
            feature_names: params.feature_names,
        })
    }

    fn feature_names_in(&self) -> &[String] {
        &self.columns
    }
}

/// Fit [`PolynomialFeatures`] on `table` and apply it, returning the fitted basis.
pub fn expand_polynomial(
    table: &Table,
    columns: &[String],
    degree: usize,
) -> Result<(Table, FittedPolynomialFeatures), PreprocessingError> {
    PolynomialFeatures::new(columns.to_vec(), degree).fit_transform(table)
}

/// Name a monomial from its column indices, e.g. `[0, 0, 1]` -> `a^2 b`.
fn feature_name(columns: &[String], indices: &[usize]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut i = 0;
    while i < indices.len() {
        let idx = indices[i];
        let run = indices[i..].iter().take_while(|&&j| j == idx).count();
        if run == 1 {
            parts.push(columns[idx].clone());
        } else {
            parts.push(format!("{}^{}", columns[idx], run));
        }
        i += run;
    }
    parts.join(" ")
}

/// Generate all non-bias polynomial combinations up to given degree.
fn generate_polynomial_combinations(n_features: usize, degree: usize) -> Vec<Vec<usize>> {
    let mut combinations = Vec::new();
    for d in 1..=degree {
        generate_degree_combinations(n_features, d, &mut Vec::new(), &mut combinations);
    }
    combinations
}

/// Recursively generate non-decreasing index sequences of a given length.
fn generate_degree_combinations(
    n_features: usize,
    remaining_degree: usize,
    current: &mut Vec<usize>,
    result: &mut Vec<Vec<usize>>,
) {
    if remaining_degree == 0 {
        result.push(current.clone());
        return;
    }

    let start = current.last().copied().unwrap_or(0);
    for i in start..n_features {
        current.push(i);
        generate_degree_combinations(n_features, remaining_degree - 1, current, result);
        current.pop();
    }
}
