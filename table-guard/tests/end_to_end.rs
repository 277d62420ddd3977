//! End-to-end runs: files on disk through the library and the binary.

use std::path::{Path, PathBuf};
use std::process::Command;
use table_guard::config::load_rules;
use table_guard::core::Validator;
use table_guard::formatters::write_reports;
use table_guard::sources::load_table;
use tempfile::TempDir;

const CUSTOMERS: &str = "\
user_id,age,email,signup_date
1,10,a@b.com,2022-01-01
2,,bad@,2019-01-01
2,200,c@d.com,2023-05-05
";

const RULES: &str = r#"
rules:
  - column: user_id
    unique: true
  - column: age
    type: int
    min: 0
    max: 120
  - column: email
    regex: '^[^@\s]+@[^@\s]+\.[^@\s]+$'
  - column: signup_date
    type: date
    min: '2020-01-01'
"#;

fn fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_customer_scenario() {
    let dir = TempDir::new().unwrap();
    let data = fixture(dir.path(), "customers.csv", CUSTOMERS);
    let config = fixture(dir.path(), "rules.yaml", RULES);

    let table = load_table(&data).await.unwrap();
    let rules = load_rules(&config).unwrap();
    let report = Validator::new().validate(&table, &rules);

    let (json_path, md_path) = write_reports(&report, &dir.path().join("report")).unwrap();
    let json = read_json(&json_path);

    assert_eq!(json["summary"]["rows_checked"], 3);
    assert_eq!(json["summary"]["rows_failed"], 2);
    assert_eq!(json["summary"]["validation_passed"], false);

    let errors: Vec<(u64, String, String)> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["row"].as_u64().unwrap(),
                e["column"].as_str().unwrap().to_string(),
                e["error"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    let expected = [
        (1, "user_id", "Duplicate value found"),
        (2, "user_id", "Duplicate value found"),
        (2, "age", "Value 200 above max 120"),
        (1, "email", "Regex mismatch: bad@"),
        (1, "signup_date", "Value 2019-01-01 below min 2020-01-01"),
    ];
    assert_eq!(
        errors,
        expected
            .iter()
            .map(|(r, c, m)| (*r, c.to_string(), m.to_string()))
            .collect::<Vec<_>>()
    );

    let markdown = std::fs::read_to_string(md_path).unwrap();
    assert!(markdown.contains("- Row `2`, Column `age` → Value 200 above max 120"));
}

#[tokio::test]
async fn test_parallel_run_matches_sequential_on_files() {
    let dir = TempDir::new().unwrap();
    let data = fixture(dir.path(), "customers.csv", CUSTOMERS);
    let config = fixture(dir.path(), "rules.yaml", RULES);

    let table = load_table(&data).await.unwrap();
    let rules = load_rules(&config).unwrap();

    let sequential = Validator::new().validate(&table, &rules);
    let parallel = Validator::builder()
        .parallel(true)
        .max_workers(4)
        .build()
        .validate(&table, &rules);
    assert_eq!(sequential, parallel);
}

#[test]
fn test_cli_writes_reports() {
    let dir = TempDir::new().unwrap();
    let data = fixture(dir.path(), "customers.csv", CUSTOMERS);
    let config = fixture(dir.path(), "rules.yaml", RULES);
    let prefix = dir.path().join("out");

    let output = Command::new(env!("CARGO_BIN_EXE_table-guard"))
        .arg("--input")
        .arg(&data)
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&prefix)
        .arg("--parallel")
        .output()
        .unwrap();

    // a failed validation is still a completed run
    assert!(output.status.success(), "{output:?}");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Validation completed"));

    let json = read_json(&dir.path().join("out.json"));
    assert_eq!(json["summary"]["validation_passed"], false);
    assert!(dir.path().join("out.md").exists());
}

fn run_cli(input: &Path, config: &Path, prefix: &Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_table-guard"))
        .arg("--input")
        .arg(input)
        .arg("--config")
        .arg(config)
        .arg("--output")
        .arg(prefix)
        .output()
        .unwrap()
}

#[test]
fn test_cli_fails_on_bad_config() {
    let dir = TempDir::new().unwrap();
    let data = fixture(dir.path(), "customers.csv", CUSTOMERS);
    let config = fixture(
        dir.path(),
        "rules.yaml",
        "rules:\n  - column: email\n    regex: '[unclosed'\n",
    );

    let output = run_cli(&data, &config, &dir.path().join("out"));

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("[unclosed"));
    assert!(!dir.path().join("out.json").exists());
}

#[test]
fn test_cli_tolerates_unknown_type_and_keys() {
    let dir = TempDir::new().unwrap();
    let data = fixture(dir.path(), "customers.csv", CUSTOMERS);
    let config = fixture(
        dir.path(),
        "rules.yaml",
        "rules:\n  - column: age\n    type: integer\n    severity: high\n    max: 120\n",
    );

    let output = run_cli(&data, &config, &dir.path().join("out"));

    assert!(output.status.success(), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("integer"), "{stderr}");
    assert!(stderr.contains("severity"), "{stderr}");

    // no coercion, but the range check still runs on the inferred ints
    let json = read_json(&dir.path().join("out.json"));
    assert_eq!(json["summary"]["rows_failed"], 1);
    assert_eq!(json["errors"][0]["error"], "Value 200 above max 120");
}

#[test]
fn test_cli_fails_on_missing_input() {
    let dir = TempDir::new().unwrap();
    let config = fixture(dir.path(), "rules.yaml", RULES);

    for name in ["missing.csv", "missing.parquet", "missing.xlsx"] {
        let output = run_cli(&dir.path().join(name), &config, &dir.path().join("out"));
        assert!(!output.status.success(), "{name}: {output:?}");
        assert!(String::from_utf8_lossy(&output.stderr).contains(name), "{name}");
        assert!(!dir.path().join("out.json").exists(), "{name}");
    }
}

#[test]
fn test_cli_fails_on_unreadable_input() {
    let dir = TempDir::new().unwrap();
    let config = fixture(dir.path(), "rules.yaml", RULES);
    let parquet = fixture(dir.path(), "customers.parquet", "not parquet at all");
    let xlsx = fixture(dir.path(), "customers.xlsx", "binary");

    for data in [parquet, xlsx] {
        let output = run_cli(&data, &config, &dir.path().join("out"));
        assert!(!output.status.success(), "{data:?}");
        assert!(!dir.path().join("out.json").exists());
    }
}

#[test]
fn test_cli_fails_on_unsupported_input() {
    let dir = TempDir::new().unwrap();
    let data = fixture(dir.path(), "customers.txt", CUSTOMERS);
    let config = fixture(dir.path(), "rules.yaml", RULES);

    let output = run_cli(&data, &config, &dir.path().join("out"));

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("txt"));
}

#[test]
fn test_cli_verbosity_flags() {
    let dir = TempDir::new().unwrap();
    let data = fixture(dir.path(), "customers.csv", CUSTOMERS);
    let config = fixture(
        dir.path(),
        "rules.yaml",
        "rules:\n  - column: user_id\n    unique: true\n    severity: high\n",
    );

    let run = |flag: &str| {
        let output = Command::new(env!("CARGO_BIN_EXE_table-guard"))
            .env_remove("RUST_LOG")
            .arg("--input")
            .arg(&data)
            .arg("--config")
            .arg(&config)
            .arg("--output")
            .arg(dir.path().join("out"))
            .arg(flag)
            .output()
            .unwrap();
        assert!(output.status.success(), "{output:?}");
        String::from_utf8_lossy(&output.stderr).to_string()
    };

    let quiet = run("-q");
    assert!(quiet.contains("severity"), "{quiet}");
    assert!(!quiet.contains("Dataset loaded"), "{quiet}");

    let verbose = run("-v");
    assert!(verbose.contains("Dataset loaded"), "{verbose}");
    assert!(verbose.contains("Check evaluated"), "{verbose}");
}
