//! Parquet I/O and conversion between polars frames and [`Table`].

use crate::preprocessing::error::PreprocessingError;
use crate::table::{Column, ColumnData, Table};
use polars::prelude::{
    DataFrame, DataType, IntoColumn, NamedFrom, ParquetCompression, ParquetReader, ParquetWriter,
    PlSmallStr, SerReader, Series,
};
use std::io::Write;
use std::path::Path;

/// Read a Parquet file into a [`Table`].
pub fn read_parquet(path: impl AsRef<Path>) -> Result<Table, PreprocessingError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| PreprocessingError::io(path, e))?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(|e| PreprocessingError::io(path, e))?;
    dataframe_to_table(&df)
}

/// Write `table` as zstd-compressed Parquet.
pub fn write_parquet<W: Write>(table: &Table, writer: W) -> Result<(), PreprocessingError> {
    let mut df = table_to_dataframe(table)?;
    ParquetWriter::new(writer)
        .with_compression(ParquetCompression::Zstd(None))
        .finish(&mut df)?;
    Ok(())
}

/// Convert a polars frame into a [`Table`].
///
/// Integer and boolean columns become `int64`, `Float32` stays `float32`,
/// other floats become `float64`, and everything else is read as category
/// labels through a string cast.
pub fn dataframe_to_table(df: &DataFrame) -> Result<Table, PreprocessingError> {
    let mut columns = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        let name = col.name().to_string();
        let dtype = col.dtype().clone();

        let data = if dtype.is_integer() || dtype.is_bool() {
            let cast = col.cast(&DataType::Int64)?;
            ColumnData::Int(cast.as_materialized_series().i64()?.into_iter().collect())
        } else if dtype == DataType::Float32 {
            ColumnData::Float32(col.as_materialized_series().f32()?.into_iter().collect())
        } else if dtype.is_float() {
            let cast = col.cast(&DataType::Float64)?;
            ColumnData::Float(cast.as_materialized_series().f64()?.into_iter().collect())
        } else {
            let cast = col.cast(&DataType::String)?;
            ColumnData::Category(
                cast.as_materialized_series()
                    .str()?
                    .into_iter()
                    .map(|v| v.map(str::to_string))
                    .collect(),
            )
        };
        columns.push(Column::new(name, data));
    }

    Table::new(columns)
}

/// Convert a [`Table`] into a polars frame, preserving column order and kinds.
pub fn table_to_dataframe(table: &Table) -> Result<DataFrame, PreprocessingError> {
    let columns = table
        .columns()
        .iter()
        .map(|column| {
            let name = PlSmallStr::from(column.name());
            let series = match column.data() {
                ColumnData::Int(v) => Series::new(name, v.as_slice()),
                ColumnData::Float(v) => Series::new(name, v.as_slice()),
                ColumnData::Float32(v) => Series::new(name, v.as_slice()),
                ColumnData::Category(v) => Series::new(name, v.as_slice()),
            };
            series.into_column()
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}
