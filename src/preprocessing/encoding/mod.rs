//! Categorical feature encoding.
//!
//! ## OneHotEncoder
//! Expands each categorical column into `0/1` indicator columns, one per
//! observed category except the lexicographically first, which is the
//! dropped reference level.
//!
//! ```text
//! home = [rent, own, rent, mortgage, own]
//!   -> home_own  = [0, 1, 0, 0, 1]
//!      home_rent = [1, 0, 1, 0, 0]      (mortgage is the reference)
//! ```
//!
//! # Design Notes
//!
//! Categories are compared as strings. Numeric columns declared categorical
//! are encoded from their display form (`1`, `2.5`).

mod one_hot;

pub use one_hot::{one_hot_encode, FittedOneHotEncoder, OneHotEncoder, OneHotEncoderParams};

/// Strategy for handling categories not seen during fit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HandleUnknown {
    /// Raise an error when unknown categories are encountered.
    Error,
    /// Emit all-zero indicators for the source column, the same encoding as
    /// the reference level.
    #[default]
    Ignore,
}
