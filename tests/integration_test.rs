//! Integration tests for the bank-ledger CLI.
//!
//! These tests run the actual binary against command scripts written to
//! temporary files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const HEADER: &str = "command,account,name,amount,rate,term,loan,keyword";

/// Write a command script to a temporary file
fn script(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

/// Run the binary with the given input file and return stdout
fn run_ledger(input: &NamedTempFile) -> String {
    let mut cmd = Command::cargo_bin("bank-ledger").unwrap();
    let assert = cmd
        .env_remove("LEDGER_INTEREST_RATE")
        .env_remove("LEDGER_AMOUNT_POLICY")
        .arg(input.path())
        .assert()
        .success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn test_outcome_report_for_banking_session() {
    let input = script(&[
        "open,A1,Alice,500,,,,",
        "deposit,A1,,250,,,,",
        "withdraw,A1,,100,,,,",
        "loan,A1,,1000,5,12,,",
        "repay,A1,,400,,,1,",
        "search,A1,,,,,,deposit",
        "view,A1,,,,,,",
    ]);

    let output = run_ledger(&input);
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(
        lines,
        vec![
            "row,command,account,status,detail",
            "2,open,A1,ok,",
            "3,deposit,A1,ok,",
            "4,withdraw,A1,ok,",
            "5,loan,A1,ok,loan_id=1",
            "6,repay,A1,ok,remaining=600.0000",
            "7,search,A1,ok,Account opened with deposit of 500.0000 | Deposited 250.0000",
            "8,view,A1,ok,name=Alice;balance=650.0000;transactions=5",
        ]
    );
}

#[test]
fn test_failures_are_reported_not_fatal() {
    let input = script(&[
        "deposit,NOPE,,10,,,,",
        "open,A1,Alice,100,,,,",
        "open,A1,Bob,10,,,,",
        "withdraw,A1,,150,,,,",
        "repay,A1,,5,,,9,",
        "transfer,A1,,5,,,,",
        "view,A1,,,,,,",
    ]);

    let output = run_ledger(&input);
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines[1], "2,deposit,NOPE,error,account NOPE not found");
    assert_eq!(lines[3], "4,open,A1,error,account A1 already exists");
    assert!(lines[4].starts_with("5,withdraw,A1,error,"));
    assert!(lines[4].contains("insufficient funds"));
    assert_eq!(lines[5], "6,repay,A1,error,loan 9 not found");
    assert_eq!(lines[6], "7,transfer,A1,error,invalid command");
    assert_eq!(lines[7], "8,view,A1,ok,name=Alice;balance=100.0000;transactions=1");
}

#[test]
fn test_oversized_amounts_are_reported_not_fatal() {
    let input = script(&[
        "open,A1,Alice,79228162514264337593543950335,,,,",
        "open,A1,Alice,7922816251426433759354390,,,,",
        "deposit,A1,,1,,,,",
        "interest,A1,,,,,,",
        "view,A1,,,,,,",
    ]);

    let output = run_ledger(&input);
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines[1], "2,open,A1,error,invalid command");
    assert_eq!(lines[2], "3,open,A1,ok,");
    assert_eq!(lines[3], "4,deposit,A1,ok,");
    assert_eq!(lines[4], "5,interest,A1,error,amount out of range: interest would overflow");
    assert_eq!(
        lines[5],
        "6,view,A1,ok,name=Alice;balance=7922816251426433759354391.0000;transactions=2"
    );
}

#[test]
fn test_account_summary_file() {
    let input = script(&[
        "open,B2,Bob,20,,,,",
        "open,A1,Alice,100,,,,",
        "interest,A1,,,,,,",
        "interest,A1,,,,,,",
        "loan,B2,,300,4.5,6,,",
    ]);
    let dir = TempDir::new().unwrap();
    let summary = dir.path().join("accounts.csv");

    Command::cargo_bin("bank-ledger")
        .unwrap()
        .env_remove("LEDGER_INTEREST_RATE")
        .env_remove("LEDGER_AMOUNT_POLICY")
        .arg(input.path())
        .arg(&summary)
        .assert()
        .success();

    let written = fs::read_to_string(&summary).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines,
        vec![
            "account,name,balance,open_loans,transactions",
            "A1,Alice,102.0100,0,3",
            "B2,Bob,20.0000,1,2",
        ]
    );
}

#[test]
fn test_reject_negative_policy_from_env() {
    let input = script(&["open,A1,Alice,100,,,,", "deposit,A1,,-50,,,,"]);

    Command::cargo_bin("bank-ledger")
        .unwrap()
        .env("LEDGER_AMOUNT_POLICY", "reject-negative")
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("3,deposit,A1,error,invalid amount -50.0000"));
}

#[test]
fn test_interest_rate_from_env() {
    let input = script(&["open,A1,Alice,100,,,,", "interest,A1,,,,,,"]);

    Command::cargo_bin("bank-ledger")
        .unwrap()
        .env("LEDGER_INTEREST_RATE", "0.05")
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("3,interest,A1,ok,interest=5.0000"));
}

#[test]
fn test_invalid_config_error() {
    let input = script(&["open,A1,Alice,100,,,,"]);

    Command::cargo_bin("bank-ledger")
        .unwrap()
        .env("LEDGER_AMOUNT_POLICY", "sometimes")
        .arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("LEDGER_AMOUNT_POLICY"));
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("bank-ledger").unwrap();
    cmd.arg("nonexistent.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("bank-ledger").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing input file"));
}
