//! Pipeline configuration.
//!
//! Loaded from the `preprocess` block of a JSON params document:
//!
//! ```json
//! {
//!   "preprocess": {
//!     "input": "data/bronze/credit_risk.parquet",
//!     "output": "data/silver/credit_risk.parquet",
//!     "scaler": "standard",
//!     "target_col": "loan_status",
//!     "poly_degree": 2,
//!     "save_artifacts_dir": "artifacts/preprocess"
//!   }
//! }
//! ```

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::scaling::ScalerKind;
use crate::preprocessing::schema::{Schema, TARGET_COL};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_PARAMS_FILE: &str = "params.json";
pub const DEFAULT_POLY_DEGREE: i64 = 2;

/// Immutable configuration of one pipeline run.
///
/// `scaler` and `poly_degree` are kept as read so that [`validate`] can
/// report them as configuration errors.
///
/// [`validate`]: PreprocessConfig::validate
#[derive(Clone, Debug, PartialEq)]
pub struct PreprocessConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub scaler: String,
    pub target_col: String,
    pub poly_degree: i64,
    pub save_artifacts_dir: Option<PathBuf>,
}

#[derive(Deserialize)]
struct ParamsDocument {
    preprocess: Option<RawPreprocess>,
}

#[derive(Deserialize)]
struct RawPreprocess {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    scaler: Option<String>,
    target_col: Option<String>,
    poly_degree: Option<i64>,
    save_artifacts_dir: Option<String>,
}

impl PreprocessConfig {
    /// A configuration with default scaler, target and degree.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            scaler: ScalerKind::default().to_string(),
            target_col: TARGET_COL.to_string(),
            poly_degree: DEFAULT_POLY_DEGREE,
            save_artifacts_dir: None,
        }
    }

    /// Read the `preprocess` block of the JSON document at `path`.
    ///
    /// Missing `input` and `output` keys are reported together. An empty
    /// `save_artifacts_dir` is treated as absent.
    pub fn from_params(path: impl AsRef<Path>) -> Result<Self, PreprocessingError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| PreprocessingError::io(path, e))?;
        Self::from_json_str(&text)
    }

    /// Parse a params document already in memory.
    pub fn from_json_str(text: &str) -> Result<Self, PreprocessingError> {
        let doc: ParamsDocument = serde_json::from_str(text)
            .map_err(|e| PreprocessingError::config("preprocess", e.to_string()))?;
        let pre = doc.preprocess.ok_or_else(|| {
            PreprocessingError::config("preprocess", "missing 'preprocess' block in params file")
        })?;

        let missing: Vec<&str> = [("input", pre.input.is_none()), ("output", pre.output.is_none())]
            .into_iter()
            .filter_map(|(key, absent)| absent.then_some(key))
            .collect();
        let (Some(input), Some(output)) = (pre.input, pre.output) else {
            let keys: Vec<String> = missing.iter().map(|k| format!("preprocess.{k}")).collect();
            return Err(PreprocessingError::config(keys.join(", "), "required key is missing"));
        };

        Ok(Self {
            input,
            output,
            scaler: pre.scaler.unwrap_or_else(|| ScalerKind::default().to_string()),
            target_col: pre.target_col.unwrap_or_else(|| TARGET_COL.to_string()),
            poly_degree: pre.poly_degree.unwrap_or(DEFAULT_POLY_DEGREE),
            save_artifacts_dir: pre
                .save_artifacts_dir
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn with_scaler(mut self, kind: ScalerKind) -> Self {
        self.scaler = kind.to_string();
        self
    }

    pub fn with_target_col(mut self, target_col: impl Into<String>) -> Self {
        self.target_col = target_col.into();
        self
    }

    pub fn with_poly_degree(mut self, degree: i64) -> Self {
        self.poly_degree = degree;
        self
    }

    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_artifacts_dir = Some(dir.into());
        self
    }

    pub fn scaler_kind(&self) -> Result<ScalerKind, PreprocessingError> {
        self.scaler.parse()
    }

    pub fn degree(&self) -> Result<usize, PreprocessingError> {
        usize::try_from(self.poly_degree)
            .ok()
            .filter(|&d| d >= 1)
            .ok_or_else(|| {
                PreprocessingError::config(
                    "poly_degree",
                    format!("must be a positive integer, got {}", self.poly_degree),
                )
            })
    }

    /// The credit risk schema with this configuration's target column.
    pub fn schema(&self) -> Result<Schema, PreprocessingError> {
        Schema::credit_risk().with_target(self.target_col.clone())
    }

    /// Check every value that can be checked without reading data.
    pub fn validate(&self) -> Result<(), PreprocessingError> {
        self.scaler_kind()?;
        self.degree()?;
        self.schema()?;
        if self.input.as_os_str().is_empty() {
            return Err(PreprocessingError::config("input", "path is empty"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(PreprocessingError::config("output", "path is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_json_defaults() {
        let cfg = PreprocessConfig::from_json_str(
            r#"{"preprocess": {"input": "bronze.parquet", "output": "silver.parquet"}}"#,
        )
        .unwrap();

        assert_eq!(cfg.input, PathBuf::from("bronze.parquet"));
        assert_eq!(cfg.scaler, "standard");
        assert_eq!(cfg.target_col, "loan_status");
        assert_eq!(cfg.poly_degree, 2);
        assert_eq!(cfg.save_artifacts_dir, None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_from_json_all_keys() {
        let cfg = PreprocessConfig::from_json_str(
            r#"{
                "import": {"url": "ignored"},
                "preprocess": {
                    "input": "in.csv",
                    "output": "out.parquet",
                    "scaler": "minmax",
                    "target_col": "default_flag",
                    "poly_degree": 3,
                    "save_artifacts_dir": "artifacts"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.scaler_kind().unwrap(), ScalerKind::MinMax);
        assert_eq!(cfg.degree().unwrap(), 3);
        assert_eq!(cfg.schema().unwrap().target_col(), "default_flag");
        assert_eq!(cfg.save_artifacts_dir, Some(PathBuf::from("artifacts")));
    }

    #[test]
    fn test_empty_artifacts_dir_is_absent() {
        let cfg = PreprocessConfig::from_json_str(
            r#"{"preprocess": {"input": "a", "output": "b", "save_artifacts_dir": ""}}"#,
        )
        .unwrap();
        assert_eq!(cfg.save_artifacts_dir, None);
    }

    #[test]
    fn test_missing_block_and_keys() {
        let err = PreprocessConfig::from_json_str(r#"{"split": {}}"#).unwrap_err();
        assert!(matches!(err, PreprocessingError::Config { ref key, .. } if key == "preprocess"));

        let err = PreprocessConfig::from_json_str(r#"{"preprocess": {}}"#).unwrap_err();
        match err {
            PreprocessingError::Config { key, .. } => {
                assert_eq!(key, "preprocess.input, preprocess.output");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = PreprocessConfig::new("in.parquet", "out.parquet");
        assert!(base.clone().with_poly_degree(0).validate().is_err());
        assert!(base.clone().with_poly_degree(-1).validate().is_err());
        assert!(base.clone().with_target_col("loan_amnt").validate().is_err());

        let mut robust = base;
        robust.scaler = "robust".to_string();
        let err = robust.validate().unwrap_err();
        assert!(err.to_string().contains("scaler must be 'standard' or 'minmax'"));
    }

    #[test]
    fn test_from_params_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"preprocess": {{"input": "in.parquet", "output": "out.parquet", "scaler": "minmax"}}}}"#
        )
        .unwrap();
        let cfg = PreprocessConfig::from_params(file.path()).unwrap();
        assert_eq!(cfg, PreprocessConfig::new("in.parquet", "out.parquet").with_scaler(ScalerKind::MinMax));

        let err = PreprocessConfig::from_params("/nonexistent/params.json").unwrap_err();
        assert!(matches!(err, PreprocessingError::Io { .. }));
    }
}
