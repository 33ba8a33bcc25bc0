//! Bronze to Silver feature engineering.
//!
//! This module provides the transformers that turn a validated Bronze table
//! into a model-ready Silver table, and the orchestration that runs them.
//!
//! # Design Philosophy
//!
//! - **Two phases**: every stateful stage is a [`Transformer`] whose `fit`
//!   returns a [`FittedTransformer`]; `transform` on the fitted value is pure
//! - **Immutable tables**: stages return new tables and never mutate their input
//! - **Serializable**: fitted stages can be saved and replayed on new data
//! - **sklearn-compatible**: scaler statistics and polynomial feature names
//!   follow scikit-learn
//!
//! # Stages
//!
//! | Stage | Type | Output |
//! |-------|------|--------|
//! | Validation | [`validate_columns`] | all missing columns at once |
//! | Imputation | [`MedianImputer`] | missing numerics filled with medians |
//! | Encoding | [`OneHotEncoder`] | `{col}_{level}` indicators, first level dropped |
//! | Scaling | [`Scaler`] | `float32` standard or min-max scaled numerics |
//! | Expansion | [`PolynomialFeatures`] | monomials up to the configured degree |
//!
//! # Example
//!
//! ```ignore
//! use credit_risk_features::preprocessing::{preprocess_table, Schema, ScalerKind};
//!
//! let out = preprocess_table(&bronze, &Schema::credit_risk(), ScalerKind::Standard, 2)?;
//! out.artifacts.save("artifacts/preprocess")?;
//!
//! // Later, on new applications
//! let preprocessor = FittedPreprocessor::load("artifacts/preprocess")?;
//! let features = preprocessor.transform(&new_rows)?;
//! ```

pub mod artifacts;
pub mod encoding;
pub mod error;
pub mod feature_engineering;
pub mod imputation;
pub mod inference;
pub mod pipeline;
pub mod scaling;
pub mod schema;
pub mod split;
pub mod traits;
pub mod validation;

// Re-export main types
pub use artifacts::{EffectiveSchema, PreprocessArtifacts, POLY_FILE, SCALER_FILE, SCHEMA_FILE};
pub use encoding::{
    one_hot_encode, FittedOneHotEncoder, HandleUnknown, OneHotEncoder, OneHotEncoderParams,
};
pub use error::{ErrorKind, PreprocessingError};
pub use feature_engineering::{
    expand_polynomial, FittedPolynomialFeatures, PolynomialFeatures, PolynomialFeaturesParams,
};
pub use imputation::{impute_numerics, FittedMedianImputer, MedianImputer, MedianImputerParams};
pub use inference::FittedPreprocessor;
pub use pipeline::{
    preprocess_table, run_preprocess, PipelineError, PreprocessOutput, PreprocessRun, Stage,
};
pub use scaling::{
    scale_numerics, DegeneratePolicy, FittedMinMaxScaler, FittedScaler, FittedStandardScaler,
    MinMaxScaler, MinMaxScalerParams, Scaler, ScalerKind, ScalerParams, StandardScaler,
    StandardScalerParams,
};
pub use schema::{Schema, BRONZE_COLUMNS, CATEGORICAL_COLS, NUMERIC_COLS, TARGET_COL};
pub use split::split_target;
pub use traits::{FittedTransformer, Transformer};
pub use validation::validate_columns;
