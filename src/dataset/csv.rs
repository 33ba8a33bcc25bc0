//! CSV reader with per-column type inference.

use crate::preprocessing::error::PreprocessingError;
use crate::table::{Column, Table};
use std::path::Path;

/// Tokens read as a missing value.
const MISSING_TOKENS: [&str; 3] = ["", "?", "NA"];

fn is_missing(value: &str) -> bool {
    MISSING_TOKENS.contains(&value)
}

/// Read a headed CSV file into a [`Table`].
///
/// Each column becomes `int64` if every present value parses as an integer,
/// otherwise `float64` if every present value parses as a float, otherwise a
/// category column. A column with no present values is read as `float64`.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Table, PreprocessingError> {
    let path = path.as_ref();
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(::csv::Trim::All)
        // Row widths are checked below so a ragged file is an invalid table.
        .flexible(true)
        .from_path(path)
        .map_err(|e| PreprocessingError::io(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| PreprocessingError::io(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| PreprocessingError::io(path, e))?;
        if record.len() != headers.len() {
            return Err(PreprocessingError::InvalidTable(format!(
                "row {} has {} fields, expected {}",
                row + 1,
                record.len(),
                headers.len()
            )));
        }
        for (values, field) in raw.iter_mut().zip(record.iter()) {
            values.push((!is_missing(field)).then(|| field.to_string()));
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, values)| infer_column(name, values))
        .collect();
    Table::new(columns)
}

fn infer_column(name: String, values: Vec<Option<String>>) -> Column {
    let present = || values.iter().flatten();

    if present().next().is_none() {
        return Column::float(name, vec![None; values.len()]);
    }
    if present().all(|v| v.parse::<i64>().is_ok()) {
        let ints = values
            .iter()
            .map(|v| v.as_deref().and_then(|v| v.parse().ok()))
            .collect();
        return Column::int(name, ints);
    }
    if present().all(|v| v.parse::<f64>().is_ok()) {
        let floats = values
            .iter()
            .map(|v| v.as_deref().and_then(|v| v.parse().ok()))
            .collect();
        return Column::float(name, floats);
    }
    Column::category(name, values)
}
