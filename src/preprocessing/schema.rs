//! Schema registry for the credit risk dataset.
//!
//! The expected numeric and categorical column sets are an explicit value
//! passed through the pipeline, so alternative schemas can be exercised in
//! tests without touching process-wide state.

use crate::preprocessing::error::PreprocessingError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The fixed 12-column contract produced by the Bronze acquisition layer.
pub const BRONZE_COLUMNS: [&str; 12] = [
    "person_age",
    "person_income",
    "person_home_ownership",
    "person_emp_length",
    "loan_intent",
    "loan_grade",
    "loan_amnt",
    "loan_int_rate",
    "loan_status",
    "loan_percent_income",
    "cb_person_default_on_file",
    "cb_person_cred_hist_length",
];

/// Numeric feature columns of the credit risk dataset.
pub const NUMERIC_COLS: [&str; 7] = [
    "person_age",
    "person_income",
    "person_emp_length",
    "loan_amnt",
    "loan_int_rate",
    "loan_percent_income",
    "cb_person_cred_hist_length",
];

/// Categorical feature columns of the credit risk dataset.
pub const CATEGORICAL_COLS: [&str; 4] = [
    "person_home_ownership",
    "loan_intent",
    "loan_grade",
    "cb_person_default_on_file",
];

/// Default binary target column.
pub const TARGET_COL: &str = "loan_status";

/// Expected column sets and the target column name.
///
/// Invariants: `numeric_cols` and `categorical_cols` are disjoint and
/// duplicate-free, and `target_col` belongs to neither.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    numeric_cols: Vec<String>,
    categorical_cols: Vec<String>,
    target_col: String,
}

impl Schema {
    pub fn new<N, C>(
        numeric_cols: impl IntoIterator<Item = N>,
        categorical_cols: impl IntoIterator<Item = C>,
        target_col: impl Into<String>,
    ) -> Result<Self, PreprocessingError>
    where
        N: Into<String>,
        C: Into<String>,
    {
        let schema = Self {
            numeric_cols: numeric_cols.into_iter().map(Into::into).collect(),
            categorical_cols: categorical_cols.into_iter().map(Into::into).collect(),
            target_col: target_col.into(),
        };
        schema.check()?;
        Ok(schema)
    }

    /// The credit risk schema: 7 numeric, 4 categorical, `loan_status` target.
    pub fn credit_risk() -> Self {
        Self {
            numeric_cols: NUMERIC_COLS.iter().map(|s| s.to_string()).collect(),
            categorical_cols: CATEGORICAL_COLS.iter().map(|s| s.to_string()).collect(),
            target_col: TARGET_COL.to_string(),
        }
    }

    /// The same column sets with a different target column.
    pub fn with_target(self, target_col: impl Into<String>) -> Result<Self, PreprocessingError> {
        let schema = Self {
            target_col: target_col.into(),
            ..self
        };
        schema.check()?;
        Ok(schema)
    }

    pub fn numeric_cols(&self) -> &[String] {
        &self.numeric_cols
    }

    pub fn categorical_cols(&self) -> &[String] {
        &self.categorical_cols
    }

    pub fn target_col(&self) -> &str {
        &self.target_col
    }

    fn check(&self) -> Result<(), PreprocessingError> {
        let mut seen = HashSet::new();
        for name in self.numeric_cols.iter().chain(&self.categorical_cols) {
            if !seen.insert(name.as_str()) {
                return Err(PreprocessingError::config(
                    "schema",
                    format!("column `{name}` is declared more than once"),
                ));
            }
        }
        if seen.contains(self.target_col.as_str()) {
            return Err(PreprocessingError::config(
                "target_col",
                format!(
                    "target `{}` is also declared as a feature column",
                    self.target_col
                ),
            ));
        }
        Ok(())
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::credit_risk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_risk_schema_matches_bronze_contract() {
        let schema = Schema::credit_risk();
        let declared: HashSet<&str> = schema
            .numeric_cols()
            .iter()
            .chain(schema.categorical_cols())
            .map(String::as_str)
            .chain(std::iter::once(schema.target_col()))
            .collect();
        let bronze: HashSet<&str> = BRONZE_COLUMNS.iter().copied().collect();
        assert_eq!(declared, bronze);
    }

    #[test]
    fn test_schema_rejects_target_in_features() {
        let result = Schema::new(["age"], ["home"], "age");
        assert!(matches!(result, Err(PreprocessingError::Config { .. })));
    }

    #[test]
    fn test_schema_rejects_overlap() {
        let result = Schema::new(["age", "home"], ["home"], "status");
        assert!(matches!(result, Err(PreprocessingError::Config { .. })));
    }

    #[test]
    fn test_with_target() {
        let schema = Schema::credit_risk().with_target("default_flag").unwrap();
        assert_eq!(schema.target_col(), "default_flag");
        assert!(Schema::credit_risk().with_target("loan_amnt").is_err());
    }
}
