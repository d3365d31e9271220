use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LABELED: &str = "Date: 11 Dec 2025\nDescription: STARBUCKS COFFEE MUMBAI\nAmount: -420.00\nBalance after transaction: 18,420.50\n";
const STATEMENT: &str = "2025-12-01 Swiggy Rs 450.00 Dr\n2025-12-02 Salary Rs 50,000.00 Cr Bal 61,200.00\n";
const HUGE_DEBITS: &str = "Rs 79,228,162,514,264,337,593,543,950,335 debited on 01/12/2025 to A\nRs 5 debited on 02/12/2025 to B\n";

/// A `txtract` command whose default config location is inside `home`.
fn txtract(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("txtract").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env("HOME", home.path());
    cmd
}

#[test]
fn scan_file_as_json() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("alert.txt");
    fs::write(&input, LABELED).unwrap();

    let output = txtract(&home).arg("scan").arg(&input).output().unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["type"], "debit");
    assert_eq!(records[0]["category"], "food");
    assert_eq!(records[0]["pattern"], "labeled");
    assert_eq!(records[0]["amount"], "420.00");
}

#[test]
fn scan_stdin_as_csv() {
    let home = TempDir::new().unwrap();

    txtract(&home)
        .args(["scan", "-", "--format", "csv"])
        .write_stdin(STATEMENT)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "date,description,amount,type,category,balance,confidence,pattern",
        ))
        .stdout(predicate::str::contains("Swiggy,450.00,debit,food,,0.90,iso_inline"))
        .stdout(predicate::str::contains("61200.00"));
}

#[test]
fn scan_single_mode_returns_first_match() {
    let home = TempDir::new().unwrap();

    let output = txtract(&home)
        .args(["scan", "-", "--mode", "single"])
        .write_stdin(STATEMENT)
        .output()
        .unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["description"], "Swiggy");
}

#[test]
fn scan_text_format() {
    let home = TempDir::new().unwrap();

    txtract(&home)
        .args(["scan", "-", "--format", "text"])
        .write_stdin(LABELED)
        .assert()
        .success()
        .stdout(predicate::str::contains("STARBUCKS COFFEE MUMBAI"))
        .stdout(predicate::str::contains("balance 18420.50"))
        .stdout(predicate::str::contains("Total debits:  420.00"));
}

#[test]
fn scan_require_match_fails_without_transactions() {
    let home = TempDir::new().unwrap();

    txtract(&home)
        .args(["scan", "-", "--require-match"])
        .write_stdin("Random text without transaction data")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No transactions found"));
}

#[test]
fn scan_without_match_prints_empty_list() {
    let home = TempDir::new().unwrap();

    txtract(&home)
        .args(["scan", "-"])
        .write_stdin("Random text without transaction data")
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn scan_missing_file() {
    let home = TempDir::new().unwrap();

    txtract(&home)
        .args(["scan", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn scan_enforces_input_limit() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("small.json");
    fs::write(&config, r#"{"extraction": {"max_input_bytes": 16}}"#).unwrap();

    txtract(&home)
        .arg("--config")
        .arg(&config)
        .args(["scan", "-"])
        .write_stdin(LABELED)
        .assert()
        .failure()
        .stderr(predicate::str::contains("byte limit"));
}

#[test]
fn scan_strict_dates_drops_unparseable() {
    let home = TempDir::new().unwrap();

    txtract(&home)
        .args(["scan", "-", "--strict-dates"])
        .write_stdin("Date: someday\nDescription: Coffee\nAmount: -10.00\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn scan_writes_output_file() {
    let home = TempDir::new().unwrap();
    let output = home.path().join("out.json");

    txtract(&home)
        .args(["scan", "-", "--output"])
        .arg(&output)
        .write_stdin(LABELED)
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("STARBUCKS COFFEE MUMBAI"));
}

#[test]
fn batch_with_summary() {
    let home = TempDir::new().unwrap();
    let inbox = home.path().join("inbox");
    let out = home.path().join("out");
    fs::create_dir_all(&inbox).unwrap();
    fs::write(inbox.join("a.txt"), LABELED).unwrap();
    fs::write(inbox.join("b.sms"), STATEMENT).unwrap();
    fs::write(inbox.join("notes.md"), LABELED).unwrap();

    txtract(&home)
        .arg("batch")
        .arg(format!("{}/*", inbox.display()))
        .arg("--output-dir")
        .arg(&out)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"));

    assert!(out.join("a.json").exists());
    assert!(out.join("b.json").exists());
    assert!(!out.join("notes.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,transactions"));
    assert!(summary.contains("a.txt,success,1,420.00,0,0,"));
    assert!(summary.contains("b.sms,success,2,450.00,50000.00,0,"));
}

#[test]
fn scan_text_totals_overflow_is_an_error() {
    let home = TempDir::new().unwrap();

    txtract(&home)
        .args(["scan", "-", "--format", "text"])
        .write_stdin(HUGE_DEBITS)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Total debit amount overflows"));

    txtract(&home)
        .args(["scan", "-", "--format", "json"])
        .write_stdin(HUGE_DEBITS)
        .assert()
        .success();
}

#[test]
fn batch_summary_reports_overflowing_totals() {
    let home = TempDir::new().unwrap();
    let inbox = home.path().join("inbox");
    let out = home.path().join("out");
    fs::create_dir_all(&inbox).unwrap();
    fs::write(inbox.join("big.txt"), HUGE_DEBITS).unwrap();
    fs::write(inbox.join("a.txt"), LABELED).unwrap();

    txtract(&home)
        .arg("batch")
        .arg(format!("{}/*.txt", inbox.display()))
        .arg("--output-dir")
        .arg(&out)
        .arg("--summary")
        .assert()
        .success();

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.contains("big.txt,error,2,,,0,"));
    assert!(summary.contains("Total debit amount overflows"));
    assert!(summary.contains("a.txt,success,1,420.00,0,0,"));
}

#[test]
fn batch_without_matching_files() {
    let home = TempDir::new().unwrap();

    txtract(&home)
        .arg("batch")
        .arg(format!("{}/*.txt", home.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_init_set_get() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("conf").join("config.json");

    txtract(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    txtract(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    txtract(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "extraction.mode", "single"])
        .assert()
        .success();

    txtract(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "extraction.mode"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"single\""));

    txtract(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "extraction.mode", "both"])
        .assert()
        .failure();

    txtract(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "extraction.colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn categories_lists_priority_order() {
    let home = TempDir::new().unwrap();

    txtract(&home)
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in"))
        .stdout(predicate::str::contains(" 1. food"))
        .stdout(predicate::str::contains("starbucks"));
}

#[test]
fn categories_custom_table() {
    let home = TempDir::new().unwrap();
    let table = home.path().join("table.json");
    fs::write(&table, r#"[{"category": "health", "keywords": ["Gym"]}]"#).unwrap();

    txtract(&home)
        .args(["categories", "--json", "--table"])
        .arg(&table)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"gym\""));
}
