// ABOUTME: Integration tests for the podgen CLI binary.
// ABOUTME: Tests feed generation, validate-only mode, exit codes, and asset checks against a mock server.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use httpmock::prelude::*;
use httpmock::Method::HEAD;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const VALID_CONFIG: &str = r#"metadata:
  title: T
  description: "A show about **things**"
  link: https://example.com
  rss_feed_url: https://example.com/feed.xml
  email: a@example.com
  author: A
  image: https://example.com/cover.jpg
episodes:
  - title: One
    description: First
    publication_date: "2023-01-15T10:00:00Z"
    asset_url: https://cdn.example.com/one.mp3
"#;

fn podgen_cmd() -> Command {
    Command::cargo_bin("podgen").unwrap()
}

fn write_config(dir: &TempDir, text: &str) -> std::path::PathBuf {
    let path = dir.path().join("podcast_config.yaml");
    fs::write(&path, text).unwrap();
    path
}

fn run(input: &Path, output: &Path) -> Command {
    let mut cmd = podgen_cmd();
    cmd.arg("--input-file")
        .arg(input)
        .arg("--output-file")
        .arg(output)
        .arg("--quiet");
    cmd
}

#[test]
fn generates_feed_with_verification_skipped() {
    let dir = TempDir::new().unwrap();
    let input = write_config(&dir, VALID_CONFIG);
    let output = dir.path().join("feed.xml");

    run(&input, &output)
        .arg("--skip-asset-verification")
        .assert()
        .success()
        .stdout(predicate::str::contains("Feed written to"));

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert_eq!(xml.matches("<item>").count(), 1);
    assert!(xml.contains(r#"<guid isPermaLink="false">https://cdn.example.com/one.mp3</guid>"#));
    assert!(xml.contains("<podcast:guid>a22faa1d-2596-5ef3-943c-fe578c2e058c</podcast:guid>"));
}

#[test]
fn validate_only_does_not_write() {
    let dir = TempDir::new().unwrap();
    let input = write_config(&dir, VALID_CONFIG);
    let output = dir.path().join("feed.xml");

    run(&input, &output)
        .arg("--skip-asset-verification")
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));

    assert!(!output.exists());
}

#[test]
fn validation_errors_exit_one_and_list_locations() {
    let dir = TempDir::new().unwrap();
    let broken = VALID_CONFIG
        .replace("  title: T\n", "")
        .replace("\"2023-01-15T10:00:00Z\"", "not-a-date");
    let input = write_config(&dir, &broken);
    let output = dir.path().join("feed.xml");

    run(&input, &output)
        .arg("--skip-asset-verification")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("metadata.title: missing required field"))
        .stderr(predicate::str::contains("episodes[0].publication_date: invalid date"));

    assert!(!output.exists());
}

#[test]
fn json_report_lists_errors_on_stdout() {
    let dir = TempDir::new().unwrap();
    let broken = VALID_CONFIG.replace("  email: a@example.com\n", "  email: nope\n");
    let input = write_config(&dir, &broken);
    let output = dir.path().join("feed.xml");

    let out = run(&input, &output)
        .arg("--skip-asset-verification")
        .arg("--json-report")
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let errors = report["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["location"], "metadata.email");
    assert!(errors[0]["message"]
        .as_str()
        .unwrap()
        .starts_with("invalid email format"));
}

#[test]
fn json_report_is_empty_when_valid() {
    let dir = TempDir::new().unwrap();
    let input = write_config(&dir, VALID_CONFIG);
    let output = dir.path().join("feed.xml");

    let out = run(&input, &output)
        .arg("--skip-asset-verification")
        .arg("--validate-only")
        .arg("--json-report")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report, serde_json::json!({ "errors": [] }));
}

#[test]
fn malformed_yaml_exits_two() {
    let dir = TempDir::new().unwrap();
    let input = write_config(&dir, "metadata:\n  title: [oops\n");
    let output = dir.path().join("feed.xml");

    run(&input, &output)
        .arg("--skip-asset-verification")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("malformed input"));
}

#[test]
fn missing_input_file_exits_one() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("feed.xml");

    run(&dir.path().join("nope.yaml"), &output)
        .arg("--skip-asset-verification")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn existence_check_fills_enclosure() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(HEAD).path("/one.mp3");
        then.status(200)
            .header("content-type", "audio/mpeg")
            .header("content-length", "424242")
            .header("etag", "\"abc\"");
    });

    let dir = TempDir::new().unwrap();
    let config = VALID_CONFIG
        .replace("https://cdn.example.com/one.mp3", &server.url("/one.mp3"))
        .replace("episodes:\n", "  use_asset_hash_as_guid: yes\nepisodes:\n");
    let input = write_config(&dir, &config);
    let output = dir.path().join("feed.xml");

    run(&input, &output)
        .arg("--skip-media-probe")
        .assert()
        .success();
    mock.assert();

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.contains(r#"type="audio/mpeg" length="424242""#), "{}", xml);
    assert!(xml.contains(">etag:abc</guid>"), "{}", xml);
}

#[test]
fn unreachable_asset_fails_run() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(HEAD).path("/one.mp3");
        then.status(404);
    });

    let dir = TempDir::new().unwrap();
    let config = VALID_CONFIG.replace("https://cdn.example.com/one.mp3", &server.url("/one.mp3"));
    let input = write_config(&dir, &config);
    let output = dir.path().join("feed.xml");

    run(&input, &output)
        .arg("--skip-media-probe")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("episodes[0].asset_url"))
        .stderr(predicate::str::contains("asset unreachable"));

    assert!(!output.exists());
}
