//! Exported fitted state of a pipeline run.
//!
//! The bundle is three independently loadable bincode files with fixed names
//! in the artifact directory:
//!
//! | File | Contents |
//! |------|----------|
//! | `scaler.bin` | [`ScalerParams`] (kind plus per-column statistics) |
//! | `poly.bin` | [`PolynomialFeaturesParams`] (the expansion basis) |
//! | `schema.bin` | [`EffectiveSchema`] (column sets, medians, category levels) |

use crate::dataset::StagedWrites;
use crate::preprocessing::encoding::{FittedOneHotEncoder, HandleUnknown, OneHotEncoderParams};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::feature_engineering::{FittedPolynomialFeatures, PolynomialFeaturesParams};
use crate::preprocessing::imputation::{FittedMedianImputer, MedianImputerParams};
use crate::preprocessing::scaling::{FittedScaler, ScalerParams};
use crate::preprocessing::schema::Schema;
use crate::preprocessing::traits::FittedTransformer;
use crate::serialization::SerializableParams;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCALER_FILE: &str = "scaler.bin";
pub const POLY_FILE: &str = "poly.bin";
pub const SCHEMA_FILE: &str = "schema.bin";

/// The schema a pipeline run actually used, with the fit-time statistics of
/// the stateless-looking stages (imputation and encoding) so they can be
/// replayed on new data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectiveSchema {
    pub numeric_cols: Vec<String>,
    pub categorical_cols: Vec<String>,
    pub target_col: String,
    /// Fit-time median per numeric column.
    pub medians: Vec<Option<f64>>,
    /// Fit-time sorted levels per categorical column, reference level first.
    pub categories: Vec<Vec<String>>,
}

impl EffectiveSchema {
    pub fn from_fitted(
        schema: &Schema,
        imputer: &FittedMedianImputer,
        encoder: &FittedOneHotEncoder,
    ) -> Self {
        Self {
            numeric_cols: schema.numeric_cols().to_vec(),
            categorical_cols: schema.categorical_cols().to_vec(),
            target_col: schema.target_col().to_string(),
            medians: imputer.medians().to_vec(),
            categories: encoder.categories().to_vec(),
        }
    }

    pub fn schema(&self) -> Result<Schema, PreprocessingError> {
        Schema::new(
            self.numeric_cols.iter().cloned(),
            self.categorical_cols.iter().cloned(),
            self.target_col.clone(),
        )
    }

    /// Rebuild the fit-time imputer.
    pub fn imputer(&self) -> Result<FittedMedianImputer, PreprocessingError> {
        FittedMedianImputer::from_params(MedianImputerParams {
            columns: self.numeric_cols.clone(),
            medians: self.medians.clone(),
        })
    }

    /// Rebuild the fit-time encoder. Unseen categories encode as all zeros.
    pub fn encoder(&self) -> Result<FittedOneHotEncoder, PreprocessingError> {
        FittedOneHotEncoder::from_params(OneHotEncoderParams {
            columns: self.categorical_cols.clone(),
            categories: self.categories.clone(),
            drop_first: true,
            handle_unknown: HandleUnknown::Ignore,
        })
    }
}

/// Scaler state, expansion basis and effective schema of one pipeline run.
#[derive(Clone, Debug)]
pub struct PreprocessArtifacts {
    pub scaler: FittedScaler,
    pub poly: FittedPolynomialFeatures,
    pub schema: EffectiveSchema,
}

impl PreprocessArtifacts {
    /// Add the three artifact files under `dir` to `staged`.
    pub fn stage(&self, dir: &Path, staged: &mut StagedWrites) -> Result<(), PreprocessingError> {
        staged.stage_bytes(dir.join(SCALER_FILE), &self.scaler.to_bytes()?)?;
        staged.stage_bytes(dir.join(POLY_FILE), &self.poly.to_bytes()?)?;
        let schema = self
            .schema
            .to_bytes()
            .map_err(|e| PreprocessingError::Serialization(e.to_string()))?;
        staged.stage_bytes(dir.join(SCHEMA_FILE), &schema)?;
        Ok(())
    }

    /// Write the bundle to `dir`, all files or none.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, PreprocessingError> {
        let dir = dir.as_ref();
        let mut staged = StagedWrites::new();
        self.stage(dir, &mut staged)?;
        let written = staged.commit()?;
        info!("saved artifacts to {}", dir.display());
        Ok(written)
    }

    /// Load a bundle written by [`PreprocessArtifacts::save`].
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, PreprocessingError> {
        let dir = dir.as_ref();
        let scaler = FittedScaler::load_from_file(dir.join(SCALER_FILE))?;
        let poly = FittedPolynomialFeatures::load_from_file(dir.join(POLY_FILE))?;

        let schema_path = dir.join(SCHEMA_FILE);
        let bytes =
            std::fs::read(&schema_path).map_err(|e| PreprocessingError::io(&schema_path, e))?;
        let schema = EffectiveSchema::from_bytes(&bytes)
            .map_err(|e| PreprocessingError::Serialization(e.to_string()))?;

        Ok(Self {
            scaler,
            poly,
            schema,
        })
    }

    pub fn scaler_params(&self) -> ScalerParams {
        self.scaler.extract_params()
    }

    pub fn poly_params(&self) -> PolynomialFeaturesParams {
        self.poly.extract_params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::encoding::OneHotEncoder;
    use crate::preprocessing::feature_engineering::PolynomialFeatures;
    use crate::preprocessing::imputation::MedianImputer;
    use crate::preprocessing::scaling::{Scaler, ScalerKind};
    use crate::preprocessing::traits::Transformer;
    use crate::table::{Column, Table};

    fn create_artifacts() -> PreprocessArtifacts {
        let table = Table::new(vec![
            Column::float("age", vec![Some(20.0), None, Some(40.0)]),
            Column::category("home", vec![Some("rent"), Some("own"), Some("rent")]),
        ])
        .unwrap();
        let schema = Schema::new(["age"], ["home"], "status").unwrap();
        let numeric = schema.numeric_cols().to_vec();

        let (imputed, imputer) = MedianImputer::new(numeric.clone()).fit_transform(&table).unwrap();
        let encoder = OneHotEncoder::new(schema.categorical_cols().to_vec())
            .fit(&imputed)
            .unwrap();
        let (scaled, scaler) = Scaler::new(ScalerKind::MinMax, numeric.clone())
            .fit_transform(&imputed)
            .unwrap();
        let poly = PolynomialFeatures::new(numeric, 2).fit(&scaled).unwrap();

        PreprocessArtifacts {
            scaler,
            poly,
            schema: EffectiveSchema::from_fitted(&schema, &imputer, &encoder),
        }
    }

    #[test]
    fn test_effective_schema_records_fit_state() {
        let artifacts = create_artifacts();
        assert_eq!(artifacts.schema.medians, vec![Some(30.0)]);
        assert_eq!(artifacts.schema.categories, vec![vec!["own", "rent"]]);
        assert_eq!(artifacts.schema.schema().unwrap().target_col(), "status");
    }

    #[test]
    fn test_save_and_load_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = create_artifacts();

        let written = artifacts.save(dir.path().join("artifacts")).unwrap();
        assert_eq!(written.len(), 3);
        for name in [SCALER_FILE, POLY_FILE, SCHEMA_FILE] {
            assert!(dir.path().join("artifacts").join(name).is_file());
        }

        let loaded = PreprocessArtifacts::load(dir.path().join("artifacts")).unwrap();
        assert_eq!(loaded.scaler_params(), artifacts.scaler_params());
        assert_eq!(loaded.poly_params(), artifacts.poly_params());
        assert_eq!(loaded.schema, artifacts.schema);
        assert_eq!(loaded.poly.feature_names_out(), ["age", "age^2"]);
    }

    #[test]
    fn test_load_missing_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let err = PreprocessArtifacts::load(dir.path()).unwrap_err();
        assert!(matches!(err, PreprocessingError::Io { .. }));
    }
}
