//! In-memory columnar table.
//!
//! A [`Table`] is an ordered collection of named [`Column`]s sharing a row
//! count. Every preprocessing stage consumes a `&Table` and returns a new
//! `Table`; nothing is mutated in place.
//!
//! Missing values are represented as `None` in every column kind. Floating
//! point `NaN` read from a source is normalised to `None` on construction.
//!
//! # Example
//! ```
//! use credit_risk_features::table::{Column, Table};
//!
//! let table = Table::new(vec![
//!     Column::float("age", vec![Some(20.0), None, Some(40.0)]),
//!     Column::category("home", vec![Some("rent"), Some("own"), Some("rent")]),
//! ])
//! .unwrap();
//!
//! assert_eq!(table.n_rows(), 3);
//! assert_eq!(table.column_names(), vec!["age", "home"]);
//! ```

mod column;

pub use column::{Column, ColumnData, ColumnKind};

use crate::preprocessing::error::PreprocessingError;
use ndarray::Array2;
use std::collections::HashSet;

/// Ordered collection of equally long named columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table, checking that column names are unique and that every
    /// column has the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self, PreprocessingError> {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(PreprocessingError::InvalidTable(format!(
                    "duplicate column name `{}`",
                    column.name()
                )));
            }
            if column.len() != n_rows {
                return Err(PreprocessingError::InvalidTable(format!(
                    "column `{}` has {} rows, expected {}",
                    column.name(),
                    column.len(),
                    n_rows
                )));
            }
        }

        Ok(Self { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name() == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Look up a column, failing with [`PreprocessingError::ColumnNotFound`] when absent.
    pub fn require(&self, name: &str) -> Result<&Column, PreprocessingError> {
        self.column(name)
            .ok_or_else(|| PreprocessingError::ColumnNotFound(name.to_string()))
    }

    /// A new table without the named columns. Unknown names are ignored.
    pub fn drop_columns<S: AsRef<str>>(&self, names: &[S]) -> Table {
        let drop: HashSet<&str> = names.iter().map(AsRef::as_ref).collect();
        let columns: Vec<Column> = self
            .columns
            .iter()
            .filter(|c| !drop.contains(c.name()))
            .cloned()
            .collect();
        let n_rows = if columns.is_empty() { 0 } else { self.n_rows };
        Table { columns, n_rows }
    }

    /// Remove a single column and return it alongside the remaining table.
    pub fn take_column(&self, name: &str) -> Option<(Table, Column)> {
        let taken = self.column(name)?.clone();
        Some((self.drop_columns(&[name]), taken))
    }

    /// A new table with `column` appended after the existing ones.
    pub fn with_column(&self, column: Column) -> Result<Table, PreprocessingError> {
        let mut columns = self.columns.clone();
        columns.push(column);
        Table::new(columns)
    }

    /// A new table with `column` replacing the same-named column at its position.
    pub fn replace_column(&self, column: Column) -> Result<Table, PreprocessingError> {
        let idx = self
            .columns
            .iter()
            .position(|c| c.name() == column.name())
            .ok_or_else(|| {
                PreprocessingError::InvalidTable(format!(
                    "cannot replace unknown column `{}`",
                    column.name()
                ))
            })?;
        let mut columns = self.columns.clone();
        columns[idx] = column;
        Table::new(columns)
    }

    /// Gather the named numeric columns into a dense `(rows, columns)` matrix.
    ///
    /// Fails with [`PreprocessingError::DataQuality`] if any value is missing
    /// or a column is not numeric.
    pub fn numeric_matrix<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Array2<f64>, PreprocessingError> {
        let mut matrix = Array2::<f64>::zeros((self.n_rows, names.len()));
        for (j, name) in names.iter().enumerate() {
            let name = name.as_ref();
            let values = self.require(name)?.to_f64()?;
            for (i, value) in values.into_iter().enumerate() {
                matrix[[i, j]] = value.ok_or_else(|| PreprocessingError::DataQuality {
                    column: name.to_string(),
                    reason: format!("missing value at row {i}"),
                })?;
            }
        }
        Ok(matrix)
    }
}
