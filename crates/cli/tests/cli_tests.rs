//! CLI integration tests
//!
//! These never touch the network: every candidate is a URL the fetcher
//! rejects before connecting.
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("siftpage");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_requires_urls() {
    cmd().assert().failure();
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-probe"))
        .stdout(predicate::str::contains("--field"));
}

#[test]
fn test_cli_title_falls_back_to_first_url() {
    cmd()
        .args(["--field", "title", "not-a-url", "also-not-a-url"])
        .assert()
        .success()
        .stdout("not-a-url\n");
}

#[test]
fn test_cli_absent_text_prints_nothing() {
    cmd()
        .args(["--field", "text", "not-a-url"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_cli_all_fields_text() {
    cmd()
        .arg("not-a-url")
        .assert()
        .success()
        .stdout(predicate::str::contains("title: not-a-url"))
        .stdout(predicate::str::contains("image: -"))
        .stdout(predicate::str::contains("text: -"));
}

#[test]
fn test_cli_json_format() {
    let assert = cmd().args(["-f", "json", "not-a-url"]).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(value["title"], "not-a-url");
    assert!(value["text"].is_null());
    assert!(value["image"].is_null());
}

#[test]
fn test_cli_json_single_field() {
    let assert = cmd().args(["-f", "json", "--field", "image", "not-a-url"]).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert!(value["image"].is_null());
    assert!(value.get("title").is_none());
}

#[test]
fn test_cli_unsupported_scheme_is_logged() {
    cmd()
        .args(["--field", "title", "file:///etc/hostname"])
        .assert()
        .success()
        .stdout("file:///etc/hostname\n")
        .stderr(predicate::str::contains("Unsupported scheme"));
}

#[test]
fn test_cli_invalid_field() {
    cmd().args(["--field", "body", "not-a-url"]).assert().failure();
}

#[test]
fn test_cli_invalid_format() {
    cmd().args(["-f", "markdown", "not-a-url"]).assert().failure();
}

#[test]
fn test_cli_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("result.json");

    cmd()
        .args(["-f", "json", "-o", output.to_str().unwrap(), "not-a-url"])
        .assert()
        .success()
        .stdout("");

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("not-a-url"));
}

#[test]
fn test_cli_verbose() {
    cmd()
        .args(["-v", "--no-probe", "not-a-url"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Siftpage"))
        .stderr(predicate::str::contains("Fetching candidate pages"));
}

#[test]
fn test_completions_match_flags() {
    let bash = std::fs::read_to_string(concat!(env!("OUT_DIR"), "/completions/siftpage.bash")).unwrap();

    assert!(bash.contains("--user-agent"));
    assert!(bash.contains("--no-probe"));
    assert!(!bash.contains("--user_agent"));
    assert!(!bash.contains("--no_probe"));
}

#[test]
fn test_cli_accepts_hyphenated_flags() {
    cmd()
        .args(["--no-probe", "--user-agent", "siftpage-test", "--field", "title", "not-a-url"])
        .assert()
        .success()
        .stdout("not-a-url\n");
}
