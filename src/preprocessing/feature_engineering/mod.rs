//! Feature engineering transformers.
//!
//! This module provides transformers that derive new features from the scaled
//! numeric columns.

mod polynomial;

pub use polynomial::{
    expand_polynomial, FittedPolynomialFeatures, PolynomialFeatures, PolynomialFeaturesParams,
};
