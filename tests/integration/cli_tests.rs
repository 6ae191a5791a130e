//! Exit-code checks of the `uniscrape` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn uniscrape(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("uniscrape").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("DOCUMENT_STORE_KEY")
        .env_remove("AI_SERVICE_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_no_mode_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    uniscrape(&dir)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no mode selected"))
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_two_modes_are_a_usage_error() {
    let dir = TempDir::new().unwrap();
    uniscrape(&dir)
        .args(["--scrape", "--crawl_and_scrape"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be combined"));

    // Rejected before any file is touched
    assert!(!dir.path().join("logs").exists());
    assert!(!dir.path().join("visited").exists());
}

#[test]
fn test_missing_seed_file_fails() {
    let dir = TempDir::new().unwrap();
    uniscrape(&dir)
        .arg("--scrape")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Source unavailable"));
}

#[test]
fn test_malformed_env_file_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".env"), "NOT A VALID LINE\n").unwrap();

    uniscrape(&dir)
        .arg("--scrape")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Failed to read .env file"));

    let log = std::fs::read_to_string(dir.path().join("logs/app_log.log")).unwrap();
    assert!(log.contains("Failed to read .env file"));
}

#[test]
fn test_missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    uniscrape(&dir)
        .args(["--config", "absent.toml", "--crawl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_database_sink_without_secret_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("uniscrape.toml"),
        "[output]\nsink = \"database\"\n",
    )
    .unwrap();
    uniscrape(&dir)
        .arg("--scrape")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DOCUMENT_STORE_KEY"));
}
