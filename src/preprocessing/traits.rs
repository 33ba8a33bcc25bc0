//! Core traits for preprocessing transformers.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: Used during fitting; has hyperparameters and learns from a table.
//! - [`FittedTransformer`]: After fitting; replays the learned state on any table.
//!
//! The split is what lets a pipeline run export its fitted state and an
//! inference caller apply it to new data without re-deriving statistics.

use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;
use crate::table::Table;
use std::path::Path;

/// Trait for unfitted transformers with hyperparameters.
///
/// # Example
/// ```ignore
/// use credit_risk_features::preprocessing::{Transformer, FittedTransformer, StandardScaler};
///
/// let scaler = StandardScaler::new(vec!["person_age".to_string()]);
/// let fitted = scaler.fit(&bronze)?;
/// let scaled = fitted.transform(&bronze)?;
/// ```
pub trait Transformer: Clone {
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Params = Self::Params>;

    /// Learn parameters (medians, categories, centers and scales, or an
    /// expansion basis) from `table`.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if:
    /// - A configured column is absent from the table
    /// - A column cannot be summarised (all values missing, degenerate range)
    fn fit(&self, table: &Table) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit on `table` and apply the result to the same table.
    ///
    /// Returns the transformed table together with the fitted state so the
    /// caller can export it.
    fn fit_transform(&self, table: &Table) -> Result<(Table, Self::Fitted), PreprocessingError> {
        let fitted = self.fit(table)?;
        let transformed = fitted.transform(table)?;
        Ok((transformed, fitted))
    }
}

/// Trait for fitted transformers ready for inference.
///
/// A fitted transformer is immutable. `transform` never mutates its input and
/// always returns a new [`Table`].
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `save_to_file` / `load_from_file` use the same bincode encoding on every platform.
pub trait FittedTransformer: Clone {
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Apply the learned parameters to `table`.
    fn transform(&self, table: &Table) -> Result<Table, PreprocessingError>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>
    where
        Self: Sized;

    /// Names of the columns this transformer reads.
    fn feature_names_in(&self) -> &[String];

    /// Encode the learned parameters.
    fn to_bytes(&self) -> Result<Vec<u8>, PreprocessingError> {
        self.extract_params()
            .to_bytes()
            .map_err(|e| PreprocessingError::Serialization(e.to_string()))
    }

    /// Decode learned parameters produced by [`FittedTransformer::to_bytes`].
    fn from_bytes(bytes: &[u8]) -> Result<Self, PreprocessingError>
    where
        Self: Sized,
    {
        let params = Self::Params::from_bytes(bytes)
            .map_err(|e| PreprocessingError::Serialization(e.to_string()))?;
        Self::from_params(params)
    }

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes).map_err(|e| PreprocessingError::io(path.as_ref(), e))
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PreprocessingError>
    where
        Self: Sized,
    {
        let bytes =
            std::fs::read(path.as_ref()).map_err(|e| PreprocessingError::io(path.as_ref(), e))?;
        Self::from_bytes(&bytes)
    }
}

/// Fail with [`PreprocessingError::FeatureMismatch`] unless every expected
/// column is present in `table`.
pub(crate) fn check_columns(table: &Table, expected: &[String]) -> Result<(), PreprocessingError> {
    if expected.iter().all(|name| table.contains(name)) {
        return Ok(());
    }
    Err(PreprocessingError::FeatureMismatch {
        expected: expected.to_vec(),
        got: table.column_names().into_iter().map(String::from).collect(),
    })
}
