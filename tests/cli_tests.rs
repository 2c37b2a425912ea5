//! CLI integration tests.

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn outcome_amm() -> Command {
    cargo_bin_cmd!("outcome-amm")
}

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn test_help() {
    outcome_amm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("outcome-amm"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("quote"))
        .stdout(predicate::str::contains("simulate"));
}

#[test]
fn check_config_accepts_valid_file() {
    let file = write_temp_config("[fees]\nfee_bps = 20\n");

    outcome_amm()
        .args(["check", "config", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"))
        .stdout(predicate::str::contains("20 bps"));
}

#[test]
fn check_config_returns_nonzero_on_invalid_value() {
    let file = write_temp_config("[markets]\nvirtual_liquidity = 0\n");

    outcome_amm()
        .args(["check", "config", "-c"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("virtual_liquidity"));
}

#[test]
fn quote_prints_json_for_balanced_buy() {
    outcome_amm()
        .args([
            "quote", "--outcome", "yes", "--shares", "50", "--fee-bps", "0", "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"amount\": 100000000"))
        .stdout(predicate::str::contains("\"fee\": 0"));
}

#[test]
fn quote_rejects_draining_the_reserve() {
    outcome_amm()
        .args(["quote", "--outcome", "no", "--shares", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("drain"));
}

#[test]
fn quote_rejects_unknown_outcome() {
    outcome_amm()
        .args(["quote", "--outcome", "maybe", "--shares", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected yes or no"));
}

#[test]
fn simulate_runs_full_lifecycle() {
    outcome_amm()
        .args(["simulate", "--settle-price", "90000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settlement"))
        .stdout(predicate::str::contains("NO"))
        .stdout(predicate::str::contains("Balances"));
}
