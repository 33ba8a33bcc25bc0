use credit_risk_features::config::PreprocessConfig;
use credit_risk_features::dataset::{read_parquet, read_table, write_parquet};
use credit_risk_features::preprocessing::{
    run_preprocess, ErrorKind, FittedPreprocessor, PreprocessingError, ScalerKind, Stage,
    BRONZE_COLUMNS, POLY_FILE, SCALER_FILE, SCHEMA_FILE,
};
use credit_risk_features::table::{Column, ColumnData, ColumnKind, Table};
use std::fs::File;
use std::path::Path;

fn credit_bronze() -> Table {
    Table::new(vec![
        Column::int("person_age", vec![Some(22), Some(21), Some(25), None, Some(23), Some(24)]),
        Column::int(
            "person_income",
            vec![Some(59000), Some(9600), Some(9600), Some(65500), Some(54400), Some(9900)],
        ),
        Column::category(
            "person_home_ownership",
            vec![Some("RENT"), Some("OWN"), Some("MORTGAGE"), Some("RENT"), Some("RENT"), Some("OWN")],
        ),
        Column::float(
            "person_emp_length",
            vec![Some(123.0), Some(5.0), Some(1.0), Some(4.0), Some(8.0), None],
        ),
        Column::category(
            "loan_intent",
            vec![
                Some("PERSONAL"),
                Some("EDUCATION"),
                Some("MEDICAL"),
                Some("MEDICAL"),
                Some("MEDICAL"),
                Some("VENTURE"),
            ],
        ),
        Column::category(
            "loan_grade",
            vec![Some("D"), Some("B"), Some("C"), Some("C"), Some("C"), Some("A")],
        ),
        Column::int(
            "loan_amnt",
            vec![Some(35000), Some(1000), Some(5500), Some(35000), Some(35000), Some(2500)],
        ),
        Column::float(
            "loan_int_rate",
            vec![Some(16.02), Some(11.14), Some(12.87), Some(15.23), None, Some(7.14)],
        ),
        Column::int("loan_status", vec![Some(1), Some(0), Some(1), Some(1), Some(1), Some(1)]),
        Column::float(
            "loan_percent_income",
            vec![Some(0.59), Some(0.1), Some(0.57), Some(0.53), Some(0.55), Some(0.25)],
        ),
        Column::category(
            "cb_person_default_on_file",
            vec![Some("Y"), Some("N"), Some("N"), Some("N"), Some("Y"), Some("N")],
        ),
        Column::int(
            "cb_person_cred_hist_length",
            vec![Some(3), Some(2), Some(3), Some(2), Some(4), Some(2)],
        ),
    ])
    .unwrap()
}

fn write_bronze(table: &Table, path: &Path) {
    let file = File::create(path).unwrap();
    write_parquet(table, file).unwrap();
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[test]
fn test_bronze_fixture_matches_contract() {
    assert_eq!(credit_bronze().column_names(), BRONZE_COLUMNS.to_vec());
}

#[test]
fn test_run_preprocess_writes_silver_and_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bronze/credit_risk.parquet");
    std::fs::create_dir_all(input.parent().unwrap()).unwrap();
    write_bronze(&credit_bronze(), &input);

    let output = dir.path().join("silver/credit_risk.parquet");
    let artifacts = dir.path().join("artifacts");
    let cfg = PreprocessConfig::new(&input, &output).with_artifacts_dir(&artifacts);

    let run = run_preprocess(&cfg).unwrap();
    assert_eq!(run.output, output);

    let silver = read_table(&output).unwrap();
    assert_eq!(silver.n_rows(), 6);

    // 2 + 3 + 3 + 1 indicators, 35 monomials of 7 columns, target.
    assert_eq!(silver.n_columns(), 9 + 35 + 1);
    assert_eq!(silver.column_names().last(), Some(&"loan_status"));
    assert_eq!(
        silver.column("loan_status").unwrap().data(),
        credit_bronze().column("loan_status").unwrap().data()
    );
    assert!(silver.column("person_home_ownership_RENT").is_some());
    assert!(silver.column("person_home_ownership_MORTGAGE").is_none());
    assert!(silver.column("person_age loan_amnt").is_some());
    assert_eq!(
        silver.column("person_income^2").unwrap().kind(),
        ColumnKind::Float32
    );
    assert!(silver.columns().iter().all(|c| !c.has_missing()));

    for name in [SCALER_FILE, POLY_FILE, SCHEMA_FILE] {
        assert!(artifacts.join(name).is_file(), "{name} missing");
    }
}

#[test]
fn test_missing_loan_grade_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bronze.parquet");
    write_bronze(&credit_bronze().drop_columns(&["loan_grade"]), &input);

    let out_dir = dir.path().join("silver");
    let artifacts = dir.path().join("artifacts");
    let cfg = PreprocessConfig::new(&input, out_dir.join("credit_risk.parquet"))
        .with_artifacts_dir(&artifacts);

    let err = run_preprocess(&cfg).unwrap_err();
    assert_eq!(err.stage, Stage::Validate);
    assert_eq!(err.kind(), ErrorKind::Schema);
    match &err.source {
        PreprocessingError::Schema {
            missing_numeric,
            missing_categorical,
        } => {
            assert!(missing_numeric.is_empty());
            assert_eq!(missing_categorical, &vec!["loan_grade".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(count_files(&out_dir), 0);
    assert_eq!(count_files(&artifacts), 0);
}

#[test]
fn test_failed_artifact_write_leaves_no_new_directories() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bronze.parquet");
    write_bronze(&credit_bronze(), &input);
    let artifacts = dir.path().join("artifacts");
    std::fs::write(&artifacts, b"not a directory").unwrap();

    let cfg = PreprocessConfig::new(&input, dir.path().join("silver/credit_risk.parquet"))
        .with_artifacts_dir(&artifacts);
    let err = run_preprocess(&cfg).unwrap_err();

    assert_eq!(err.stage, Stage::Write);
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(!dir.path().join("silver").exists());
    assert!(artifacts.is_file());
}

#[test]
fn test_silver_only_appears_after_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bronze.parquet");
    write_bronze(&credit_bronze(), &input);
    let artifacts = dir.path().join("artifacts");
    // A non-empty directory where schema.bin belongs makes its rename fail.
    std::fs::create_dir_all(artifacts.join(SCHEMA_FILE).join("keep")).unwrap();
    let output = dir.path().join("silver/credit_risk.parquet");

    let cfg = PreprocessConfig::new(&input, &output).with_artifacts_dir(&artifacts);
    let err = run_preprocess(&cfg).unwrap_err();

    assert_eq!(err.stage, Stage::Write);
    assert!(!output.exists());
    assert!(!dir.path().join("silver").exists());
}

#[test]
fn test_artifacts_replay_matches_silver() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bronze.parquet");
    write_bronze(&credit_bronze(), &input);

    let output = dir.path().join("silver.parquet");
    let artifacts = dir.path().join("artifacts");
    let cfg = PreprocessConfig::new(&input, &output)
        .with_scaler(ScalerKind::MinMax)
        .with_poly_degree(1)
        .with_artifacts_dir(&artifacts);
    run_preprocess(&cfg).unwrap();

    let silver = read_parquet(&output).unwrap();
    let preprocessor = FittedPreprocessor::load(&artifacts).unwrap();
    let replayed = preprocessor.transform(&read_table(&input).unwrap()).unwrap();
    assert_eq!(replayed, silver.drop_columns(&["loan_status"]));

    let new_application = Table::new(vec![
        Column::int("person_age", vec![None]),
        Column::int("person_income", vec![Some(40000)]),
        Column::category("person_home_ownership", vec![Some("OTHER")]),
        Column::float("person_emp_length", vec![Some(2.0)]),
        Column::category("loan_intent", vec![Some("HOMEIMPROVEMENT")]),
        Column::category("loan_grade", vec![Some("B")]),
        Column::int("loan_amnt", vec![Some(8000)]),
        Column::float("loan_int_rate", vec![Some(10.5)]),
        Column::float("loan_percent_income", vec![Some(0.2)]),
        Column::category("cb_person_default_on_file", vec![Some("N")]),
        Column::int("cb_person_cred_hist_length", vec![Some(3)]),
    ])
    .unwrap();
    let features = preprocessor.transform(&new_application).unwrap();
    assert_eq!(features.n_rows(), 1);
    assert_eq!(features.n_columns(), silver.n_columns() - 1);
    assert_eq!(
        features.column("person_home_ownership_RENT").unwrap().data(),
        &ColumnData::Int(vec![Some(0)])
    );
    assert_eq!(
        features.column("loan_grade_B").unwrap().data(),
        &ColumnData::Int(vec![Some(1)])
    );
}

#[test]
fn test_params_file_drives_run() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bronze.parquet");
    write_bronze(&credit_bronze(), &input);
    let output = dir.path().join("silver.parquet");

    let params = dir.path().join("params.json");
    let doc = serde_json::json!({
        "preprocess": {
            "input": input,
            "output": output,
            "scaler": "robust"
        }
    });
    std::fs::write(&params, doc.to_string()).unwrap();

    let cfg = PreprocessConfig::from_params(&params).unwrap();
    let err = run_preprocess(&cfg).unwrap_err();
    assert_eq!(err.stage, Stage::Config);
    assert!(!output.exists());
}
