//! Integration tests for the ledger validator CLI.
//!
//! These tests run the actual binary and verify output against expected CSV files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

struct Outputs {
    _dir: TempDir,
    balances: PathBuf,
    outcomes: PathBuf,
}

fn outputs() -> Outputs {
    let dir = TempDir::new().unwrap();
    Outputs {
        balances: dir.path().join("balances.csv"),
        outcomes: dir.path().join("outcomes.csv"),
        _dir: dir,
    }
}

fn validator(bins: &str, out: &Outputs) -> Command {
    let mut cmd = Command::cargo_bin("ledger-validator").unwrap();
    cmd.arg(test_data_path("users.csv"))
        .arg(test_data_path("transactions.csv"))
        .arg(test_data_path(bins))
        .arg(&out.balances)
        .arg(&out.outcomes);
    cmd
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

#[test]
fn test_full_batch_outcomes() {
    let out = outputs();
    validator("bins.csv", &out).assert().success();

    assert_eq!(
        read_lines(&out.outcomes),
        read_lines(Path::new(&test_data_path("expected_outcomes.csv")))
    );
}

#[test]
fn test_full_batch_balances() {
    let out = outputs();
    validator("bins.csv", &out).assert().success();

    assert_eq!(
        read_lines(&out.balances),
        read_lines(Path::new(&test_data_path("expected_balances.csv")))
    );
}

#[test]
fn test_output_headers() {
    let out = outputs();
    validator("bins.csv", &out).assert().success();

    assert!(fs::read_to_string(&out.balances)
        .unwrap()
        .starts_with("USER_ID,BALANCE\n"));
    assert!(fs::read_to_string(&out.outcomes)
        .unwrap()
        .starts_with("transaction_id,status,message\n"));
}

#[test]
fn test_missing_bin_mapping_is_fatal() {
    let out = outputs();
    validator("bins_incomplete.csv", &out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No bin mapping found for card 4100000050123456"));

    assert!(!out.balances.exists());
    assert!(!out.outcomes.exists());
}

#[test]
fn test_missing_file_error() {
    let out = outputs();
    let mut cmd = Command::cargo_bin("ledger-validator").unwrap();
    cmd.arg("nonexistent.csv")
        .arg(test_data_path("transactions.csv"))
        .arg(test_data_path("bins.csv"))
        .arg(&out.balances)
        .arg(&out.outcomes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("ledger-validator").unwrap();
    cmd.arg(test_data_path("users.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing arguments"));
}
