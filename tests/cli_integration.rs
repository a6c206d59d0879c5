use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

const VECT: &str = r#"{"vocabulary": {"march": 0, "rally": 1, "strike": 2, "tuition": 3}, "idf": [1.0, 1.0, 1.0, 1.0]}"#;

const FORM_CLF: &str = r#"{
    "classes": ["march", "rally", "strike"],
    "coef": [[2.0, 0.0, 0.0, 0.0], [0.0, 2.0, 0.0, 0.0], [0.0, 0.0, 2.0, 0.0]],
    "intercept": [0.0, 0.0, 0.0],
    "loss": "log"
}"#;

const ISSUE_CLF: &str = r#"{
    "classes": ["education", "labor"],
    "coef": [[0.0, 0.0, 2.0, -2.0]],
    "intercept": [0.0],
    "loss": "hinge"
}"#;

fn artifact_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "form-vect_2017-05-23.json", VECT);
    write(dir.path(), "form_2017-05-23.json", FORM_CLF);
    write(dir.path(), "issue-vect_2017-05-23.json", VECT);
    write(dir.path(), "issue_2017-05-23.json", ISSUE_CLF);
    dir
}

fn write(dir: &Path, name: &str, body: &str) {
    std::fs::write(dir.join(name), body).unwrap();
}

#[allow(deprecated)]
fn mpeds_cmd(artifacts: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mpeds").unwrap();
    cmd.env("MPEDS_ARTIFACTS", artifacts);
    cmd.env("MPEDS_CONFIG", artifacts.join("absent-config.toml"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn classify_json_batch() {
    let dir = artifact_dir();
    let output = mpeds_cmd(dir.path())
        .args(["classify", "--task", "form", "--json"])
        .write_stdin(r#"["a strike at the mill", "the march began", "rally rally"]"#)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!(["strike", "march", "rally"]));
}

#[test]
fn classify_scalar_stays_scalar() {
    let dir = artifact_dir();
    mpeds_cmd(dir.path())
        .args(["classify", "--task", "form", "--json"])
        .write_stdin(r#""the march began""#)
        .assert()
        .success()
        .stdout("\"march\"\n");
}

#[test]
fn classify_lines_from_file() {
    let dir = artifact_dir();
    let input = dir.path().join("docs.txt");
    std::fs::write(&input, "strike vote\n\nrally downtown\n").unwrap();

    let output = mpeds_cmd(dir.path())
        .args(["classify", "--task", "form"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!(["strike", "rally"]));
}

#[test]
fn probabilities_report_classes() {
    let dir = artifact_dir();
    let output = mpeds_cmd(dir.path())
        .args(["classify", "--task", "form", "--probabilities", "--json"])
        .write_stdin(r#"["strike", "march"]"#)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["classes"], serde_json::json!(["march", "rally", "strike"]));
    let rows = value["probabilities"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        let sum: f64 = row.as_array().unwrap().iter().map(|v| v.as_f64().unwrap()).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}

#[test]
fn issue_probabilities_unsupported_exits_zero() {
    let dir = artifact_dir();
    mpeds_cmd(dir.path())
        .args(["classify", "--task", "issue", "--probabilities", "--json"])
        .write_stdin(r#"["tuition strike"]"#)
        .assert()
        .success()
        .stdout("{\"unsupported\":\"issue\"}\n");
}

#[test]
fn haystack_alias_without_artifacts_fails() {
    let dir = artifact_dir();
    let output = mpeds_cmd(dir.path())
        .args(["classify", "--task", "haystack", "--json"])
        .write_stdin(r#""a protest""#)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot load vectorizer artifact for relevance"), "{stderr}");
}

#[test]
fn non_text_json_is_invalid_input() {
    let dir = artifact_dir();
    let output = mpeds_cmd(dir.path())
        .args(["lede", "--json"])
        .write_stdin("[\"fine\", 42]")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid input"));
}

#[test]
fn extract_size_scalar() {
    let dir = artifact_dir();
    mpeds_cmd(dir.path())
        .args(["extract", "--kind", "size", "--json"])
        .write_stdin(r#""About 300 protesters gathered.""#)
        .assert()
        .success()
        .stdout("{\"kind\":\"size\",\"value\":300}\n");
}

#[test]
fn extract_smo_alias() {
    let dir = artifact_dir();
    let output = mpeds_cmd(dir.path())
        .args(["extract", "--kind", "smo", "--json"])
        .write_stdin(r#"["Organizers from the Black Student Union spoke.", "quiet day"]"#)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        serde_json::json!([
            {"kind": "organizations", "value": ["Black Student Union"]},
            {"kind": "absent"}
        ])
    );
}

#[test]
fn lede_lines() {
    let dir = artifact_dir();
    mpeds_cmd(dir.path())
        .arg("lede")
        .write_stdin("A.<br/>B.<br/>C.\nOnlyOneSentence\n")
        .assert()
        .success()
        .stdout("[\"A.\",\"OnlyOneSentence\"]\n");
}

#[test]
fn lede_custom_delimiter_from_config() {
    let dir = artifact_dir();
    let config = dir.path().join("mpeds.toml");
    std::fs::write(&config, "[lede]\ndelimiter = \" | \"\n").unwrap();

    mpeds_cmd(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["lede", "--json"])
        .write_stdin(r#""first | second""#)
        .assert()
        .success()
        .stdout("\"first\"\n");
}
