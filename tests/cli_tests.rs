/// Tests for the one-shot command-line estimator
/// Runs the built binary with a record on stdin
use serde_json::{json, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const SCENARIO_A: &str = r#"{"area": 70, "bedrooms": 2, "bathrooms": 1, "parkingSpaces": 1,
    "hasElevator": "no", "hasPool": "no", "hasSecurity": "no",
    "furnished": "no", "propertyType": "apartment"}"#;

/// Copies the estimator into a fresh directory, so the artifact lookup next
/// to the executable only sees what the test puts there.
fn isolated_estimator() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let exe = dir.path().join(
        Path::new(env!("CARGO_BIN_EXE_rust-rent-estimator"))
            .file_name()
            .unwrap(),
    );
    std::fs::copy(env!("CARGO_BIN_EXE_rust-rent-estimator"), &exe).unwrap();
    (dir, exe)
}

fn run_estimator(exe: &Path, input: &str) -> Output {
    let mut child = Command::new(exe)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("estimator should start");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn diagnostics(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stderr)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("diagnostic should be JSON"))
        .collect()
}

fn single_line(output: &Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    serde_json::from_str(stdout.trim()).unwrap()
}

#[test]
fn test_missing_artifact_reports_once_and_uses_fallback() {
    let (_dir, exe) = isolated_estimator();
    let output = run_estimator(&exe, SCENARIO_A);

    assert!(output.status.success());
    let body = single_line(&output);
    assert_eq!(body["prediction"]["predicted_price"], 3610.0);
    assert_eq!(body["prediction"]["model_version"], "v1.0-fallback");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Segurança 24h"));

    let reported = diagnostics(&output);
    assert_eq!(reported.len(), 1);
    let object = reported[0].as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert!(object["error"]
        .as_str()
        .unwrap()
        .starts_with("Model not found at"));
}

#[test]
fn test_artifact_next_to_executable_is_used() {
    let (dir, exe) = isolated_estimator();
    let artifact = json!({
        "model_version": "modelo_3_regressao_linear",
        "feature_names": [
            "const", "area_primeiro_andar", "existe_segundo_andar",
            "quantidade_banheiros", "qualidade_da_cozinha_Excelente"
        ],
        "coefficients": [500.0, 25.0, 400.0, 300.0, 350.0]
    });
    std::fs::write(
        dir.path().join("modelo_3_regressao_linear.json"),
        artifact.to_string(),
    )
    .unwrap();

    let output = run_estimator(&exe, SCENARIO_A);

    assert!(output.status.success());
    assert!(diagnostics(&output).is_empty());
    let body = single_line(&output);
    assert_eq!(body["prediction"]["model_version"], "modelo_3_regressao_linear");
    // 500 + 70*25 + 300
    assert_eq!(body["prediction"]["predicted_price"], 2550.0);
    assert_eq!(body["prediction"]["features_used"]["area_primeiro_andar"], 70.0);
}

#[test]
fn test_malformed_input_aborts_without_output() {
    let (_dir, exe) = isolated_estimator();
    let output = run_estimator(&exe, "area=70&bedrooms=2");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let reported = diagnostics(&output);
    let last = reported.last().expect("a diagnostic should be written");
    assert!(last["error"].as_str().unwrap().contains("Invalid input"));
}

#[test]
fn test_non_finite_area_aborts_without_output() {
    let (_dir, exe) = isolated_estimator();
    let output = run_estimator(&exe, r#"{"area": "inf"}"#);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let last = diagnostics(&output).pop().expect("a diagnostic should be written");
    assert!(last["error"].as_str().unwrap().contains("area"));
}
