//! Bronze to Silver orchestration.
//!
//! Stages run in a fixed order, each consuming the previous table:
//!
//! ```text
//! split target -> validate -> impute -> encode -> scale -> expand -> reattach target
//! ```
//!
//! The first failing stage aborts the run. [`run_preprocess`] stages the
//! Silver table and the artifact bundle next to their destinations and only
//! renames them into place once everything has been written.

use crate::config::PreprocessConfig;
use crate::dataset::{read_table, write_parquet, StagedWrites};
use crate::preprocessing::artifacts::{EffectiveSchema, PreprocessArtifacts};
use crate::preprocessing::encoding::OneHotEncoder;
use crate::preprocessing::error::{ErrorKind, PreprocessingError};
use crate::preprocessing::feature_engineering::PolynomialFeatures;
use crate::preprocessing::imputation::MedianImputer;
use crate::preprocessing::scaling::{Scaler, ScalerKind};
use crate::preprocessing::schema::Schema;
use crate::preprocessing::split::split_target;
use crate::preprocessing::traits::Transformer;
use crate::preprocessing::validation::validate_columns;
use crate::table::Table;
use log::{debug, info};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A step of the pipeline, used to report where a run failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Config,
    Read,
    Split,
    Validate,
    Impute,
    Encode,
    Scale,
    Expand,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Read => "read",
            Stage::Split => "split",
            Stage::Validate => "validate",
            Stage::Impute => "impute",
            Stage::Encode => "encode",
            Stage::Scale => "scale",
            Stage::Expand => "expand",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// The first failure of a pipeline run and the stage it happened in.
#[derive(Debug, Error)]
#[error("preprocessing failed at stage `{stage}`: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: PreprocessingError,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, PipelineError>;
}

impl<T> AtStage<T> for Result<T, PreprocessingError> {
    fn at(self, stage: Stage) -> Result<T, PipelineError> {
        self.map_err(|source| PipelineError { stage, source })
    }
}

/// Silver table plus the fitted state that produced it.
#[derive(Clone, Debug)]
pub struct PreprocessOutput {
    pub table: Table,
    pub artifacts: PreprocessArtifacts,
}

/// Where a completed [`run_preprocess`] wrote its outputs.
#[derive(Clone, Debug)]
pub struct PreprocessRun {
    pub output: PathBuf,
    pub artifact_dir: Option<PathBuf>,
    pub artifacts: PreprocessArtifacts,
}

/// Transform a Bronze table into a Silver table in memory.
///
/// The target column is split off first and appended, unchanged and as
/// `int64`, as the last column of the result.
pub fn preprocess_table(
    bronze: &Table,
    schema: &Schema,
    scaler: ScalerKind,
    degree: usize,
) -> Result<PreprocessOutput, PipelineError> {
    let numeric = schema.numeric_cols().to_vec();
    let categorical = schema.categorical_cols().to_vec();

    let (features, target) = split_target(bronze, schema.target_col()).at(Stage::Split)?;
    validate_columns(&features, schema).at(Stage::Validate)?;

    let (imputed, imputer) = MedianImputer::new(numeric.clone())
        .fit_transform(&features)
        .at(Stage::Impute)?;

    let (encoded, encoder) = OneHotEncoder::new(categorical)
        .fit_transform(&imputed)
        .at(Stage::Encode)?;
    debug!("produced {} indicator columns", encoder.n_features_out());

    let (scaled, fitted_scaler) = Scaler::new(scaler, numeric.clone())
        .fit_transform(&encoded)
        .at(Stage::Scale)?;
    debug!("scaled {} numeric columns with the {} scaler", numeric.len(), scaler);

    let (expanded, poly) = PolynomialFeatures::new(numeric, degree)
        .fit_transform(&scaled)
        .at(Stage::Expand)?;

    let table = expanded.with_column(target).at(Stage::Split)?;

    Ok(PreprocessOutput {
        table,
        artifacts: PreprocessArtifacts {
            scaler: fitted_scaler,
            poly,
            schema: EffectiveSchema::from_fitted(schema, &imputer, &encoder),
        },
    })
}

/// Run the whole Bronze to Silver step described by `cfg`.
///
/// The configuration is validated before the input is read. On success the
/// Silver table exists at `cfg.output` and, when configured, the artifact
/// bundle in `cfg.save_artifacts_dir`; on failure neither is written.
pub fn run_preprocess(cfg: &PreprocessConfig) -> Result<PreprocessRun, PipelineError> {
    cfg.validate().at(Stage::Config)?;
    let scaler = cfg.scaler_kind().at(Stage::Config)?;
    let degree = cfg.degree().at(Stage::Config)?;
    let schema = cfg.schema().at(Stage::Config)?;

    let bronze = read_table(&cfg.input).at(Stage::Read)?;
    let PreprocessOutput { table, artifacts } = preprocess_table(&bronze, &schema, scaler, degree)?;

    // Silver is staged last so it only appears next to a complete bundle.
    let mut staged = StagedWrites::new();
    if let Some(dir) = &cfg.save_artifacts_dir {
        artifacts.stage(dir, &mut staged).at(Stage::Write)?;
    }
    staged
        .stage_with(&cfg.output, |file| write_parquet(&table, file))
        .at(Stage::Write)?;
    staged.commit().at(Stage::Write)?;

    info!(
        "preprocessed data written to {} ({} rows, {} cols)",
        cfg.output.display(),
        table.n_rows(),
        table.n_columns()
    );
    if let Some(dir) = &cfg.save_artifacts_dir {
        info!("saved artifacts to {}", dir.display());
    }

    Ok(PreprocessRun {
        output: cfg.output.clone(),
        artifact_dir: cfg.save_artifacts_dir.clone(),
        artifacts,
    })
}
