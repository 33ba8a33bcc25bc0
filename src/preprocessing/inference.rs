//! Replay of a saved pipeline run on new data.
//!
//! A [`FittedPreprocessor`] is rebuilt from a [`PreprocessArtifacts`] bundle
//! and applies exactly the fit-time transformation: imputation with the
//! fit-time medians, encoding with the fit-time category levels (unseen
//! values encode as all zeros), and the saved scaler and expansion basis.
//! No statistic is recomputed from the new table.

use crate::preprocessing::artifacts::PreprocessArtifacts;
use crate::preprocessing::encoding::FittedOneHotEncoder;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::feature_engineering::FittedPolynomialFeatures;
use crate::preprocessing::imputation::FittedMedianImputer;
use crate::preprocessing::scaling::FittedScaler;
use crate::preprocessing::schema::Schema;
use crate::preprocessing::traits::FittedTransformer;
use crate::preprocessing::validation::validate_columns;
use crate::table::Table;
use std::path::Path;

/// Fitted imputer, encoder, scaler and expander of one pipeline run.
#[derive(Clone, Debug)]
pub struct FittedPreprocessor {
    schema: Schema,
    imputer: FittedMedianImputer,
    encoder: FittedOneHotEncoder,
    scaler: FittedScaler,
    poly: FittedPolynomialFeatures,
}

impl FittedPreprocessor {
    pub fn from_artifacts(artifacts: &PreprocessArtifacts) -> Result<Self, PreprocessingError> {
        Ok(Self {
            schema: artifacts.schema.schema()?,
            imputer: artifacts.schema.imputer()?,
            encoder: artifacts.schema.encoder()?,
            scaler: artifacts.scaler.clone(),
            poly: artifacts.poly.clone(),
        })
    }

    /// Load the artifact bundle saved in `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, PreprocessingError> {
        Self::from_artifacts(&PreprocessArtifacts::load(dir)?)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Names of the expanded numeric features, in output order.
    pub fn expanded_feature_names(&self) -> &[String] {
        self.poly.feature_names_out()
    }

    /// Apply the fit-time transformation to a feature table.
    ///
    /// A target column, if present, is dropped. The result has the same
    /// column layout as the Silver table minus the target.
    pub fn transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        let features = table.drop_columns(&[self.schema.target_col()]);
        validate_columns(&features, &self.schema)?;

        let imputed = self.imputer.transform(&features)?;
        let encoded = self.encoder.transform(&imputed)?;
        let scaled = self.scaler.transform(&encoded)?;
        self.poly.transform(&scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::pipeline::preprocess_table;
    use crate::preprocessing::scaling::ScalerKind;
    use crate::table::{Column, ColumnData};

    fn create_bronze() -> Table {
        Table::new(vec![
            Column::float("age", vec![Some(20.0), Some(25.0), None, Some(40.0), Some(50.0)]),
            Column::int(
                "income",
                vec![Some(1000), Some(2000), Some(3000), Some(4000), Some(5000)],
            ),
            Column::category(
                "home",
                vec![Some("rent"), Some("own"), Some("rent"), Some("mortgage"), Some("own")],
            ),
            Column::int("status", vec![Some(0), Some(1), Some(0), Some(1), Some(0)]),
        ])
        .unwrap()
    }

    fn schema() -> Schema {
        Schema::new(["age", "income"], ["home"], "status").unwrap()
    }

    #[test]
    fn test_replay_matches_silver() {
        let bronze = create_bronze();
        let out = preprocess_table(&bronze, &schema(), ScalerKind::Standard, 2).unwrap();
        let preprocessor = FittedPreprocessor::from_artifacts(&out.artifacts).unwrap();

        let replayed = preprocessor.transform(&bronze).unwrap();
        assert_eq!(replayed, out.table.drop_columns(&["status"]));
        assert_eq!(
            preprocessor.expanded_feature_names(),
            ["age", "income", "age^2", "age income", "income^2"]
        );
        let names = replayed.column_names();
        assert!(names.ends_with(&["age", "income", "age^2", "age income", "income^2"]));
    }

    #[test]
    fn test_replay_uses_fit_time_statistics() {
        let out = preprocess_table(&create_bronze(), &schema(), ScalerKind::MinMax, 1).unwrap();
        let preprocessor = FittedPreprocessor::from_artifacts(&out.artifacts).unwrap();

        let new_rows = Table::new(vec![
            Column::float("age", vec![None, Some(50.0)]),
            Column::int("income", vec![Some(3000), Some(9000)]),
            Column::category("home", vec![Some("boat"), Some("rent")]),
        ])
        .unwrap();
        let replayed = preprocessor.transform(&new_rows).unwrap();

        assert_eq!(
            replayed.column_names(),
            vec!["home_own", "home_rent", "age", "income"]
        );
        // Unseen `boat` encodes like the reference level.
        assert_eq!(
            replayed.column("home_rent").unwrap().data(),
            &ColumnData::Int(vec![Some(0), Some(1)])
        );
        assert_eq!(
            replayed.column("home_own").unwrap().data(),
            &ColumnData::Int(vec![Some(0), Some(0)])
        );
        // Missing age takes the fit-time median 32.5, scaled by the fit-time range [20, 50].
        assert_eq!(
            replayed.column("age").unwrap().data(),
            &ColumnData::Float32(vec![Some(((32.5 - 20.0) / 30.0) as f32), Some(1.0)])
        );
        assert_eq!(
            replayed.column("income").unwrap().data(),
            &ColumnData::Float32(vec![Some(0.5), Some(2.0)])
        );
    }

    #[test]
    fn test_replay_requires_schema_columns() {
        let out = preprocess_table(&create_bronze(), &schema(), ScalerKind::Standard, 2).unwrap();
        let preprocessor = FittedPreprocessor::from_artifacts(&out.artifacts).unwrap();

        let partial = create_bronze().drop_columns(&["home"]);
        assert!(matches!(
            preprocessor.transform(&partial),
            Err(PreprocessingError::Schema { .. })
        ));
    }
}
