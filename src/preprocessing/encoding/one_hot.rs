//! One-hot encoding for categorical features.
//!
//! Transforms categorical columns into `0/1` integer indicator columns named
//! `{column}_{category}`.

use crate::preprocessing::encoding::HandleUnknown;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{check_columns, FittedTransformer, Transformer};
use crate::table::{Column, Table};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One-hot encoder for categorical features.
///
/// The encoder learns the distinct values of each column during fitting and
/// orders them lexicographically. With `drop_first` (the default) the first
/// category of each column is the reference level and gets no indicator, so
/// a column with `k` categories produces `k - 1` indicator columns.
///
/// Non-categorical columns pass through unchanged in their original relative
/// order; indicator columns are appended after them, grouped per source
/// column in the order the columns were given.
///
/// # Example
/// ```ignore
/// use credit_risk_features::preprocessing::{OneHotEncoder, Transformer, FittedTransformer};
///
/// let encoder = OneHotEncoder::new(vec!["home".to_string()]);
/// let fitted = encoder.fit(&table)?;
/// let encoded = fitted.transform(&table)?;
/// // columns: [..., "home_own", "home_rent"]
/// ```
#[derive(Clone, Debug)]
pub struct OneHotEncoder {
    columns: Vec<String>,
    drop_first: bool,
    handle_unknown: HandleUnknown,
}

impl OneHotEncoder {
    /// Create a new OneHotEncoder over `columns` that drops the first category.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            drop_first: true,
            handle_unknown: HandleUnknown::default(),
        }
    }

    /// Set whether the first category of each column is dropped.
    pub fn with_drop_first(mut self, drop_first: bool) -> Self {
        self.drop_first = drop_first;
        self
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }
}

/// Serializable parameters for a fitted OneHotEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoderParams {
    /// Source columns, in expansion order.
    pub columns: Vec<String>,
    /// Sorted categories observed for each source column, reference included.
    pub categories: Vec<Vec<String>>,
    /// Whether the first category of each column is dropped.
    pub drop_first: bool,
    /// Handle unknown strategy.
    pub handle_unknown: HandleUnknown,
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder {
    columns: Vec<String>,
    categories: Vec<Vec<String>>,
    drop_first: bool,
    handle_unknown: HandleUnknown,
}

impl FittedOneHotEncoder {
    /// Get the categories learned for each column (reference level first).
    pub fn categories(&self) -> &[Vec<String>] {
        &self.categories
    }

    /// Categories that receive an indicator column, per source column.
    fn encoded_levels(&self, idx: usize) -> &[String] {
        let levels = &self.categories[idx];
        if self.drop_first && !levels.is_empty() {
            &levels[1..]
        } else {
            levels
        }
    }

    /// Names of the indicator columns, in output order.
    pub fn feature_names_out(&self) -> Vec<String> {
        self.columns
            .iter()
            .enumerate()
            .flat_map(|(idx, name)| {
                self.encoded_levels(idx)
                    .iter()
                    .map(move |level| indicator_name(name, level))
            })
            .collect()
    }

    /// Number of indicator columns produced.
    pub fn n_features_out(&self) -> usize {
        (0..self.columns.len())
            .map(|idx| self.encoded_levels(idx).len())
            .sum()
    }
}

fn indicator_name(column: &str, level: &str) -> String {
    format!("{column}_{level}")
}

impl Transformer for OneHotEncoder {
    type Params = OneHotEncoderParams;
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, table: &Table) -> Result<Self::Fitted, PreprocessingError> {
        let mut categories = Vec::with_capacity(self.columns.len());

        for name in &self.columns {
            let levels: BTreeSet<String> = table
                .require(name)?
                .labels()
                .into_iter()
                .flatten()
                .collect();
            categories.push(levels.into_iter().collect());
        }

        Ok(FittedOneHotEncoder {
            columns: self.columns.clone(),
            categories,
            drop_first: self.drop_first,
            handle_unknown: self.handle_unknown,
        })
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Params = OneHotEncoderParams;

    fn transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        check_columns(table, &self.columns)?;

        let n_rows = table.n_rows();
        let mut indicators = Vec::with_capacity(self.n_features_out());

        for (idx, name) in self.columns.iter().enumerate() {
            let known: HashMap<&str, usize> = self.categories[idx]
                .iter()
                .enumerate()
                .map(|(i, level)| (level.as_str(), i))
                .collect();
            let offset = usize::from(self.drop_first && !self.categories[idx].is_empty());
            let levels = self.encoded_levels(idx);
            let mut values = vec![vec![Some(0i64); n_rows]; levels.len()];

            for (row, label) in table.require(name)?.labels().iter().enumerate() {
                // Missing labels encode as all zeros.
                let Some(label) = label else { continue };
                match known.get(label.as_str()) {
                    Some(&pos) if pos >= offset => values[pos - offset][row] = Some(1),
                    Some(_) => {}
                    None if self.handle_unknown == HandleUnknown::Error => {
                        return Err(PreprocessingError::DataQuality {
                            column: name.clone(),
                            reason: format!("unknown category `{label}` at row {row}"),
                        });
                    }
                    None => {}
                }
            }

            for (level, values) in levels.iter().zip(values) {
                indicators.push(Column::int(indicator_name(name, level), values));
            }
            debug!("encoded `{}` into {} indicator columns", name, levels.len());
        }

        let passthrough = table.drop_columns(&self.columns);
        let mut columns = passthrough.into_columns();
        columns.extend(indicators);
        Table::new(columns)
    }

    fn extract_params(&self) -> Self::Params {
        OneHotEncoderParams {
            columns: self.columns.clone(),
            categories: self.categories.clone(),
            drop_first: self.drop_first,
            handle_unknown: self.handle_unknown,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.columns.len() != params.categories.len() {
            return Err(PreprocessingError::Serialization(format!(
                "encoder has {} columns but {} category lists",
                params.columns.len(),
                params.categories.len()
            )));
        }
        Ok(FittedOneHotEncoder {
            columns: params.columns,
            categories: params.categories,
            drop_first: params.drop_first,
            handle_unknown: params.handle_unknown,
        })
    }

    fn feature_names_in(&self) -> &[String] {
        &self.columns
    }
}

/// Fit a [`OneHotEncoder`] (first category dropped) on `table` and apply it.
pub fn one_hot_encode(table: &Table, columns: &[String]) -> Result<Table, PreprocessingError> {
    let (encoded, _) = OneHotEncoder::new(columns.to_vec()).fit_transform(table)?;
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnData;
    use proptest::prelude::*;

    fn create_test_table() -> Table {
        Table::new(vec![
            Column::float("age", vec![Some(1.0); 5]),
            Column::category(
                "home",
                vec![Some("rent"), Some("own"), Some("rent"), Some("mortgage"), Some("own")],
            ),
            Column::int("term", vec![Some(36), Some(60), Some(36), Some(36), Some(60)]),
        ])
        .unwrap()
    }

    fn home() -> Vec<String> {
        vec!["home".to_string()]
    }

    fn ints(values: &[i64]) -> ColumnData {
        ColumnData::Int(values.iter().map(|&v| Some(v)).collect())
    }

    #[test]
    fn test_one_hot_drops_lexicographic_first() {
        let out = one_hot_encode(&create_test_table(), &home()).unwrap();

        assert_eq!(out.column_names(), vec!["age", "term", "home_own", "home_rent"]);
        assert_eq!(out.column("home_own").unwrap().data(), &ints(&[0, 1, 0, 0, 1]));
        assert_eq!(out.column("home_rent").unwrap().data(), &ints(&[1, 0, 1, 0, 0]));
        assert!(out.column("home_mortgage").is_none());
    }

    #[test]
    fn test_one_hot_k_minus_one_columns() {
        let fitted = OneHotEncoder::new(home()).fit(&create_test_table()).unwrap();
        assert_eq!(fitted.categories()[0], vec!["mortgage", "own", "rent"]);
        assert_eq!(fitted.n_features_out(), 2);
    }

    #[test]
    fn test_one_hot_without_drop_first() {
        let encoder = OneHotEncoder::new(home()).with_drop_first(false);
        let (out, fitted) = encoder.fit_transform(&create_test_table()).unwrap();
        assert_eq!(fitted.n_features_out(), 3);
        assert_eq!(out.column("home_mortgage").unwrap().data(), &ints(&[0, 0, 0, 1, 0]));
    }

    #[test]
    fn test_one_hot_numeric_categories() {
        let out = one_hot_encode(&create_test_table(), &["term".to_string()]).unwrap();
        assert_eq!(out.column_names(), vec!["age", "home", "term_60"]);
        assert_eq!(out.column("term_60").unwrap().data(), &ints(&[0, 1, 0, 0, 1]));
    }

    #[test]
    fn test_one_hot_expansion_order_follows_columns() {
        let cols = vec!["term".to_string(), "home".to_string()];
        let out = one_hot_encode(&create_test_table(), &cols).unwrap();
        assert_eq!(out.column_names(), vec!["age", "term_60", "home_own", "home_rent"]);
    }

    #[test]
    fn test_one_hot_is_deterministic() {
        let a = one_hot_encode(&create_test_table(), &home()).unwrap();
        let b = one_hot_encode(&create_test_table(), &home()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_one_hot_unknown_category_ignored() {
        let fitted = OneHotEncoder::new(home()).fit(&create_test_table()).unwrap();
        let new_table =
            Table::new(vec![Column::category("home", vec![Some("other"), Some("own"), None])])
                .unwrap();
        let out = fitted.transform(&new_table).unwrap();
        assert_eq!(out.column("home_own").unwrap().data(), &ints(&[0, 1, 0]));
        assert_eq!(out.column("home_rent").unwrap().data(), &ints(&[0, 0, 0]));
    }

    #[test]
    fn test_one_hot_unknown_category_error() {
        let fitted = OneHotEncoder::new(home())
            .with_handle_unknown(HandleUnknown::Error)
            .fit(&create_test_table())
            .unwrap();
        let new_table = Table::new(vec![Column::category("home", vec![Some("other")])]).unwrap();
        assert!(matches!(
            fitted.transform(&new_table),
            Err(PreprocessingError::DataQuality { .. })
        ));
    }

    #[test]
    fn test_one_hot_name_collision_is_rejected() {
        let table = Table::new(vec![
            Column::category("home", vec![Some("own"), Some("rent")]),
            Column::int("home_rent", vec![Some(1), Some(2)]),
        ])
        .unwrap();
        assert!(matches!(
            one_hot_encode(&table, &home()),
            Err(PreprocessingError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_one_hot_params_roundtrip() {
        let fitted = OneHotEncoder::new(home()).fit(&create_test_table()).unwrap();
        let restored = FittedOneHotEncoder::from_params(fitted.extract_params()).unwrap();
        assert_eq!(restored.feature_names_out(), vec!["home_own", "home_rent"]);
    }

    proptest! {
        #[test]
        fn prop_one_hot_k_minus_one_and_deterministic(
            labels in proptest::collection::vec(proptest::option::of("[a-d]{1,2}"), 1..40)
        ) {
            let table = Table::new(vec![Column::category("c", labels.clone())]).unwrap();
            let cols = vec!["c".to_string()];
            let (first, fitted) = OneHotEncoder::new(cols.clone()).fit_transform(&table).unwrap();
            let second = one_hot_encode(&table, &cols).unwrap();

            let distinct: BTreeSet<&String> = labels.iter().flatten().collect();
            prop_assert_eq!(fitted.n_features_out(), distinct.len().saturating_sub(1));
            prop_assert_eq!(first, second);
        }
    }
}
