//! End-to-end tests for the `xdcc-search` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::result_page;
use support::socket_guard::start_mock_server_or_skip;

/// Binary command with config lookup pointed at an empty directory.
fn xdcc_search(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("xdcc-search").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help_lists_search_subcommand() {
    let config_home = TempDir::new().unwrap();
    xdcc_search(&config_home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"));
}

#[test]
fn test_cli_search_without_keywords_fails() {
    let config_home = TempDir::new().unwrap();
    xdcc_search(&config_home)
        .arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEYWORDS"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_search_json_output() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/search.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&[[
            "Rizon",
            "#news",
            "Bot|01",
            "#42",
            "10x",
            "512K",
            "linux.iso",
        ]])))
        .mount(&server)
        .await;

    let config_home = TempDir::new().unwrap();
    let output = xdcc_search(&config_home)
        .args(["-q", "search", "--json", "--endpoint"])
        .arg(format!("{}/search.php", server.uri()))
        .args(["linux", "iso"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(value["command"], "/msg Bot|01 xdcc send #42");
    assert_eq!(value["size_bytes"], 512 * 1024);
    assert_eq!(value["url"], "http://irc.rizon.net/news");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_search_table_output() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/search.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&[[
            "Rizon",
            "#news",
            "Bot",
            "#7",
            "1x",
            "750M",
            "movie.mkv",
        ]])))
        .mount(&server)
        .await;

    let config_home = TempDir::new().unwrap();
    xdcc_search(&config_home)
        .args(["-q", "search", "--endpoint"])
        .arg(format!("{}/search.php", server.uri()))
        .arg("movie")
        .env("COLUMNS", "200")
        .assert()
        .success()
        .stdout(predicate::str::contains("movie.mkv"))
        .stdout(predicate::str::contains("750M"))
        .stdout(predicate::str::contains("/msg Bot xdcc send #7"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_search_reports_no_results() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/search.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&[])))
        .mount(&server)
        .await;

    let config_home = TempDir::new().unwrap();
    xdcc_search(&config_home)
        .args(["-q", "search", "--endpoint"])
        .arg(format!("{}/search.php", server.uri()))
        .arg("nothing")
        .assert()
        .success()
        .stdout(predicate::str::contains("No packs found."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_search_all_sources_failed_exits_nonzero() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/search.php"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config_home = TempDir::new().unwrap();
    xdcc_search(&config_home)
        .args(["-q", "search", "--endpoint"])
        .arg(format!("{}/search.php", server.uri()))
        .arg("anything")
        .assert()
        .failure()
        .stdout(predicate::str::contains("No packs found.").not())
        .stderr(predicate::str::contains("failed"));
}

#[test]
fn test_cli_invalid_config_file_fails() {
    let config_home = TempDir::new().unwrap();
    let dir = config_home.path().join("xdcc-search");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), "colour = \"blue\"\n").unwrap();

    xdcc_search(&config_home)
        .args(["search", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_cli_invalid_endpoint_fails() {
    let config_home = TempDir::new().unwrap();
    xdcc_search(&config_home)
        .args(["-q", "search", "--endpoint", "not a url", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No search sources available"));
}
