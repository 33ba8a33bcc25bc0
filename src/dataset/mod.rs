//! Bronze readers and Silver writers.
//!
//! Tables are read from Parquet (via polars) or CSV (via the `csv` crate)
//! depending on the file extension. Every write goes through
//! [`StagedWrites`]: files are written next to their destination and only
//! renamed into place once all of them were written successfully.

mod csv;
mod parquet;
mod staging;

pub use self::csv::read_csv;
pub use self::parquet::{dataframe_to_table, read_parquet, table_to_dataframe, write_parquet};
pub use self::staging::StagedWrites;

use crate::preprocessing::error::PreprocessingError;
use crate::table::Table;
use log::info;
use std::path::Path;

/// Read a table, choosing the format from the extension of `path`.
///
/// `.parquet` and `.pq` are read with polars, `.csv` with the csv reader.
pub fn read_table(path: impl AsRef<Path>) -> Result<Table, PreprocessingError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(PreprocessingError::io(path, "input file not found"));
    }

    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => read_parquet(path)?,
        "csv" => read_csv(path)?,
        _ => {
            return Err(PreprocessingError::io(
                path,
                format!("unsupported file extension `{ext}`"),
            ))
        }
    };

    info!(
        "bronze data loaded from {}: {} rows, {} columns",
        path.display(),
        table.n_rows(),
        table.n_columns()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_table_missing_file() {
        let err = read_table("/nonexistent/bronze.parquet").unwrap_err();
        assert!(matches!(err, PreprocessingError::Io { .. }));
    }

    #[test]
    fn test_read_table_unsupported_extension() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        writeln!(file, "a,b").unwrap();
        let err = read_table(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported file extension"));
    }

    #[test]
    fn test_read_table_dispatches_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "age,home").unwrap();
        writeln!(file, "20,rent").unwrap();
        let table = read_table(file.path()).unwrap();
        assert_eq!(table.shape(), (1, 2));
    }
}
