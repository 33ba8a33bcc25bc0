//! Missing value imputation for numeric columns.

mod median;

pub use median::{impute_numerics, FittedMedianImputer, MedianImputer, MedianImputerParams};
