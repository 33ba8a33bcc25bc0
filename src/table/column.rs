use crate::preprocessing::error::PreprocessingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Int,
    Float,
    /// Reduced precision float produced by scaling and expansion.
    Float32,
    Category,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        !matches!(self, ColumnKind::Category)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Int => "int64",
            ColumnKind::Float => "float64",
            ColumnKind::Float32 => "float32",
            ColumnKind::Category => "category",
        };
        f.write_str(name)
    }
}

/// Column values. `None` marks a missing value.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Float32(Vec<Option<f32>>),
    Category(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Float32(v) => v.len(),
            ColumnData::Category(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Int(_) => ColumnKind::Int,
            ColumnData::Float(_) => ColumnKind::Float,
            ColumnData::Float32(_) => ColumnKind::Float32,
            ColumnData::Category(_) => ColumnKind::Category,
        }
    }

    pub fn null_count(&self) -> usize {
        match self {
            ColumnData::Int(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Float(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Float32(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Category(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }
}

/// A named column of a [`Table`](super::Table).
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        let data = match data {
            ColumnData::Float(v) => ColumnData::Float(v.into_iter().map(drop_nan).collect()),
            ColumnData::Float32(v) => {
                ColumnData::Float32(v.into_iter().map(|x| x.filter(|x| !x.is_nan())).collect())
            }
            other => other,
        };
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn int(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        Self::new(name, ColumnData::Int(values))
    }

    pub fn float(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Float(values))
    }

    pub fn float32(name: impl Into<String>, values: Vec<Option<f32>>) -> Self {
        Self::new(name, ColumnData::Float32(values))
    }

    pub fn category<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        Self::new(
            name,
            ColumnData::Category(values.into_iter().map(|v| v.map(Into::into)).collect()),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.data.null_count()
    }

    pub fn has_missing(&self) -> bool {
        self.null_count() > 0
    }

    /// Numeric values widened to `f64`.
    ///
    /// Category columns cannot be summarised numerically and yield a
    /// [`PreprocessingError::DataQuality`] error.
    pub fn to_f64(&self) -> Result<Vec<Option<f64>>, PreprocessingError> {
        match &self.data {
            ColumnData::Int(v) => Ok(v.iter().map(|x| x.map(|x| x as f64)).collect()),
            ColumnData::Float(v) => Ok(v.clone()),
            ColumnData::Float32(v) => Ok(v.iter().map(|x| x.map(f64::from)).collect()),
            ColumnData::Category(_) => Err(PreprocessingError::DataQuality {
                column: self.name.clone(),
                reason: "expected a numeric column, found category labels".to_string(),
            }),
        }
    }

    /// Values rendered as category labels. Numeric values use their display form.
    pub fn labels(&self) -> Vec<Option<String>> {
        match &self.data {
            ColumnData::Int(v) => v.iter().map(|x| x.map(|x| x.to_string())).collect(),
            ColumnData::Float(v) => v.iter().map(|x| x.map(|x| x.to_string())).collect(),
            ColumnData::Float32(v) => v.iter().map(|x| x.map(|x| x.to_string())).collect(),
            ColumnData::Category(v) => v.clone(),
        }
    }
}

fn drop_nan(value: Option<f64>) -> Option<f64> {
    value.filter(|x| !x.is_nan())
}
