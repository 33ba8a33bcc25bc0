//! Table validation against a [`Schema`].

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::schema::Schema;
use crate::table::Table;

/// Verify that every numeric and categorical column declared by `schema` is
/// present in `table`.
///
/// All missing names are reported together in a single
/// [`PreprocessingError::Schema`], numeric and categorical separately.
/// Column types are not checked here; the imputer and scaler reject
/// non-numeric data themselves.
pub fn validate_columns(table: &Table, schema: &Schema) -> Result<(), PreprocessingError> {
    let missing = |names: &[String]| -> Vec<String> {
        names
            .iter()
            .filter(|name| !table.contains(name))
            .cloned()
            .collect()
    };

    let missing_numeric = missing(schema.numeric_cols());
    let missing_categorical = missing(schema.categorical_cols());

    if missing_numeric.is_empty() && missing_categorical.is_empty() {
        return Ok(());
    }

    Err(PreprocessingError::Schema {
        missing_numeric,
        missing_categorical,
    })
}
