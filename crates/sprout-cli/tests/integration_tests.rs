//! Integration tests for the sprout binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn sprout() -> Command {
    Command::cargo_bin("sprout").unwrap()
}

// ── Surface checks ────────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    sprout()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sprout"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_matches_cargo() {
    sprout()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_arguments_shows_help_and_fails() {
    sprout().assert().failure();
}

#[test]
fn generate_help_mentions_payload_flags() {
    sprout()
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--deploy"))
        .stdout(predicate::str::contains("--app"))
        .stdout(predicate::str::contains("--output"));
}

// ── list ──────────────────────────────────────────────────────────────────────

#[test]
fn list_shows_builtin_services() {
    sprout()
        .args(["list", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mongodb"))
        .stdout(predicate::str::contains("appid"))
        .stdout(predicate::str::contains("cloudant"));
}

#[test]
fn list_json_is_parseable() {
    let output = sprout()
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(parsed.as_array().unwrap().len() >= 10);
}

// ── validate ──────────────────────────────────────────────────────────────────

#[test]
fn validate_passes_on_builtin_catalog() {
    sprout()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("clean"));
}

// ── generate ──────────────────────────────────────────────────────────────────

#[test]
fn generate_with_inline_payload_writes_the_tree() {
    let temp = TempDir::new().unwrap();
    sprout()
        .args([
            "generate",
            "--deploy",
            r#"{"name": "acme", "backendPlatform": "NODE", "mongodb": {"uri": "mongodb://x"}}"#,
            "--app",
            r#"{"applicationType": "WEB"}"#,
            "--output",
        ])
        .arg(temp.path())
        .assert()
        .success();

    assert!(temp.path().join("package.json").exists());
    assert!(temp.path().join("server/services/service-mongodb.js").exists());
    assert!(temp.path().join("docs/services/service-mongodb.md").exists());

    let index = fs::read_to_string(temp.path().join("server/services/index.js")).unwrap();
    assert!(index.contains("require('./service-mongodb')(app, serviceManager);"));

    let localdev =
        fs::read_to_string(temp.path().join("server/localdev-config.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&localdev).unwrap();
    assert_eq!(parsed["mongodb_uri"], "mongodb://x");
}

#[test]
fn generate_from_payload_files() {
    let temp = TempDir::new().unwrap();
    let deploy = temp.path().join("deploy.json");
    let app = temp.path().join("app.json");
    fs::write(
        &deploy,
        r#"{"name": "acme", "backendPlatform": "NODE", "redis": {"uri": "redis://y"}}"#,
    )
    .unwrap();
    fs::write(&app, r#"{"applicationType": "MS"}"#).unwrap();
    let out = temp.path().join("out");

    sprout()
        .arg("generate")
        .arg("--deploy")
        .arg(&deploy)
        .arg("--app")
        .arg(&app)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("server/services/service-redis.js").exists());
}

#[test]
fn generate_dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");

    sprout()
        .args([
            "generate",
            "--deploy",
            r#"{"backendPlatform": "NODE", "mongodb": {"uri": "mongodb://x"}}"#,
            "--dry-run",
            "--output",
        ])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(!out.exists());
}

#[test]
fn generate_with_malformed_payload_fails_before_writing() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");

    sprout()
        .args(["generate", "--deploy", "{broken", "--output"])
        .arg(&out)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Malformed selection input"));

    assert!(!out.exists());
}

#[test]
fn generate_with_missing_payload_file_fails() {
    sprout()
        .args(["generate", "--deploy", "no-such-file.json"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("no-such-file.json"));
}

#[test]
fn generate_with_unknown_platform_fails() {
    sprout()
        .args([
            "generate",
            "--deploy",
            r#"{"backendPlatform": "COBOL"}"#,
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("COBOL"));
}

#[test]
fn appid_is_dropped_for_microservices() {
    let temp = TempDir::new().unwrap();
    sprout()
        .args([
            "generate",
            "--deploy",
            r#"{"backendPlatform": "NODE", "appid": {"tenantId": "t", "clientId": "c", "secret": "s", "oauthServerUrl": "o", "profilesUrl": "p"}}"#,
            "--app",
            r#"{"applicationType": "MS"}"#,
            "--output",
        ])
        .arg(temp.path())
        .assert()
        .success();

    assert!(!temp.path().join("server/services/service-appid.js").exists());
    let manifest = fs::read_to_string(temp.path().join("package.json")).unwrap();
    assert!(!manifest.contains("ibmcloud-appid"));
}

#[test]
fn generation_is_repeatable_byte_for_byte() {
    let payload =
        r#"{"name": "acme", "backendPlatform": "NODE", "mongodb": {"uri": "mongodb://x"}}"#;

    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    for out in [first.path(), second.path()] {
        sprout()
            .args(["generate", "--deploy", payload, "--output"])
            .arg(out)
            .assert()
            .success();
    }

    for rel in [
        "package.json",
        "server/services/index.js",
        "server/localdev-config.json",
        "server/config/mappings.json",
    ] {
        assert_eq!(
            fs::read(first.path().join(rel)).unwrap(),
            fs::read(second.path().join(rel)).unwrap(),
            "artifact {rel} differs between runs"
        );
    }
}
