//! Target separation.

use crate::preprocessing::error::PreprocessingError;
use crate::table::{Column, ColumnData, Table};

/// Remove `target_col` from `table`, returning the feature table and the
/// target cast to a 64-bit integer column.
///
/// Float targets must hold integral values and category targets must parse
/// as integers. A missing target value is a data quality failure.
pub fn split_target(table: &Table, target_col: &str) -> Result<(Table, Column), PreprocessingError> {
    let (features, target) = table
        .take_column(target_col)
        .ok_or_else(|| PreprocessingError::MissingTarget(target_col.to_string()))?;

    let invalid = |row: usize, reason: String| PreprocessingError::DataQuality {
        column: target_col.to_string(),
        reason: format!("row {row}: {reason}"),
    };

    let labels = match target.data() {
        ColumnData::Int(v) => v
            .iter()
            .enumerate()
            .map(|(row, x)| x.ok_or_else(|| invalid(row, "missing target value".to_string())))
            .collect::<Result<Vec<i64>, _>>()?,
        ColumnData::Category(v) => v
            .iter()
            .enumerate()
            .map(|(row, x)| {
                let label = x
                    .as_deref()
                    .ok_or_else(|| invalid(row, "missing target value".to_string()))?;
                label
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| invalid(row, format!("`{label}` is not an integer label")))
            })
            .collect::<Result<Vec<i64>, _>>()?,
        _ => target
            .to_f64()?
            .into_iter()
            .enumerate()
            .map(|(row, x)| match x {
                Some(x) if x.fract() == 0.0 => Ok(x as i64),
                Some(x) => Err(invalid(row, format!("{x} is not an integer label"))),
                None => Err(invalid(row, "missing target value".to_string())),
            })
            .collect::<Result<Vec<i64>, _>>()?,
    };

    let target = Column::int(target_col, labels.into_iter().map(Some).collect());
    Ok((features, target))
}
