use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("timeseed"))
}

/// `b"hello world"` encrypted under the key of 2023-11-14 22:13:20 UTC
/// (second 1700000000) with nonce 00..0f.
const HELLO_WORLD: [u8; 43] = [
    // nonce
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
    // tag
    0xd2, 0xc3, 0xef, 0xc8, 0x44, 0x02, 0xd7, 0xe8, 0xfa, 0x1c, 0xd7, 0x07, 0x06, 0x86, 0x76, 0xf5,
    // ciphertext
    0xc8, 0xc9, 0x39, 0x86, 0x4b, 0xbc, 0xd0, 0x91, 0x5a, 0x02, 0x44,
];

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn hello_world_file() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "hello.bin", &HELLO_WORLD);
    (dir, path)
}

#[test]
fn missing_file_argument_prints_usage() {
    bin()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn finds_key_sequentially_with_progress() {
    let (_dir, file) = hello_world_file();

    bin()
        .arg(&file)
        .arg("2023-11-14")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Brute forcing timestamps from 2023-11-14 00:00:00 to 2023-11-15 00:00:00 UTC",
        ))
        .stdout(predicate::str::contains("That's 86400 possible timestamps"))
        .stdout(predicate::str::contains(
            "Tried 10000 timestamps... currently at 2023-11-14 02:46:39 UTC",
        ))
        .stdout(predicate::str::contains("Tried 80000 timestamps"))
        .stdout(predicate::str::contains("Tried 90000").not())
        .stdout(predicate::str::contains(
            "SUCCESS! Found the key after 80001 attempts",
        ))
        .stdout(predicate::str::contains("Timestamp: 2023-11-14 22:13:20 UTC"))
        .stdout(predicate::str::contains("hello world"));
}

#[test]
fn finds_key_with_worker_threads() {
    let (_dir, file) = hello_world_file();

    bin()
        .arg(&file)
        .arg("2023-11-13")
        .arg("2")
        .arg("--threads")
        .arg("4")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timestamp: 2023-11-14 22:13:20 UTC"))
        .stdout(predicate::str::contains("hello world"));
}

#[test]
fn threads_can_come_from_env() {
    let (_dir, file) = hello_world_file();

    bin()
        .env("TIMESEED_THREADS", "2")
        .arg(&file)
        .arg("2023-11-14")
        .arg("1")
        .arg("--progress-interval")
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tried").not())
        .stdout(predicate::str::contains("hello world"));
}

#[test]
fn exhausted_window_exits_with_not_found() {
    let (_dir, file) = hello_world_file();

    bin()
        .arg(&file)
        .arg("2020-09-13")
        .arg("1")
        .arg("-j")
        .arg("4")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "Failed to decrypt after 86400 attempts",
        ));
}

#[test]
fn json_output_reports_match() {
    let (_dir, file) = hello_world_file();

    let output = bin()
        .arg(&file)
        .arg("2023-11-14")
        .arg("1")
        .arg("--json")
        .arg("-j")
        .arg("4")
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "found");
    assert_eq!(report["timestamp"], 1_700_000_000);
    assert_eq!(report["utc"], "2023-11-14 22:13:20");
    assert_eq!(report["plaintext"], "hello world");
}

#[test]
fn malformed_date_fails_before_search() {
    let (_dir, file) = hello_world_file();

    bin()
        .arg(&file)
        .arg("14.11.2023")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("expected YYYY-MM-DD"))
        .stdout(predicate::str::contains("Brute forcing").not());
}

#[test]
fn zero_days_is_rejected() {
    let (_dir, file) = hello_world_file();

    bin()
        .arg(&file)
        .arg("2023-11-14")
        .arg("0")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn short_file_is_a_format_error() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "short.bin", &HELLO_WORLD[..31]);

    bin()
        .arg(&file)
        .arg("2023-11-14")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("too short"))
        .stdout(predicate::str::contains("Brute forcing").not());
}

#[test]
fn missing_file_is_reported() {
    let dir = tempdir().unwrap();

    bin()
        .arg(dir.path().join("nope.bin"))
        .arg("2023-11-14")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("failed to read ciphertext file"));
}
