//! Integration tests for the recibo CLI.

use assert_cmd::Command;
use predicates::prelude::*;

fn recibo() -> Command {
    Command::cargo_bin("recibo").unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    recibo()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("classify"));
}

#[test]
fn test_classify_cfe_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recibo.txt");
    std::fs::write(&path, "Comisión Federal de Electricidad\nTARIFA 1C\n").unwrap();

    recibo()
        .arg("classify")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("cfe"));
}

#[test]
fn test_classify_unrecognized_text_is_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("otro.txt");
    std::fs::write(&path, "estado de cuenta bancario\n").unwrap();

    recibo()
        .arg("classify")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown"));
}

#[test]
fn test_classify_reads_stdin() {
    recibo()
        .arg("classify")
        .write_stdin("JAPAM Junta de Agua\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("japam"));
}

#[test]
fn test_process_missing_file_fails() {
    recibo()
        .arg("process")
        .arg("no-such-file.pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_unreadable_pdf_degrades_to_error_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roto.pdf");
    std::fs::write(&path, b"this is not a pdf").unwrap();

    recibo()
        .arg("process")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"service_type\":\"unknown\""))
        .stdout(predicate::str::contains("ERROR"));
}

#[test]
fn test_batch_no_matches_fails() {
    recibo()
        .arg("batch")
        .arg("nothing-matches-*.pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}
