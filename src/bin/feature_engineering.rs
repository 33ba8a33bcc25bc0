//! Bronze to Silver feature engineering step.
//!
//! Reads the params file named by `$PARAMS_FILE` (default `params.json`) and
//! runs the preprocessing pipeline described by its `preprocess` block.

use credit_risk_features::config::{PreprocessConfig, DEFAULT_PARAMS_FILE};
use credit_risk_features::preprocessing::{run_preprocess, Stage};
use log::{error, info};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let params_path =
        std::env::var("PARAMS_FILE").unwrap_or_else(|_| DEFAULT_PARAMS_FILE.to_string());
    info!("loading configuration from {params_path}");

    let cfg = match PreprocessConfig::from_params(&params_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("preprocessing failed at stage `{}`: {e}", Stage::Config);
            return ExitCode::FAILURE;
        }
    };

    match run_preprocess(&cfg) {
        Ok(run) => {
            info!("silver table ready at {}", run.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
