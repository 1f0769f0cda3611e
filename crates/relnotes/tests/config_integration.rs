//! Configuration integration tests.
//!
//! These tests verify config discovery, format parsing, and precedence
//! from an end-to-end perspective using the compiled binary, reading the
//! effective values back through `info --json` and `convert` output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CHANGELOG: &str = "1.0.0 - January 5th, 2021\n* Initial release\n";

/// Returns a Command configured to run our binary without the user's config.
#[allow(deprecated)]
fn cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env(
            "RELNOTES_LOG_DIR",
            std::env::temp_dir().join("relnotes-config-tests"),
        )
        .env_remove("RELNOTES_LOG_PATH")
        .env_remove("RUST_LOG");
    cmd
}

/// Run `info --json` from `dir` and return the `config` object.
fn effective_config(home: &Path, dir: &Path) -> serde_json::Value {
    let output = cmd(home)
        .args(["-C", dir.to_str().unwrap(), "--json", "info"])
        .assert()
        .success();
    let json: serde_json::Value =
        serde_json::from_slice(&output.get_output().stdout).expect("info --json output");
    json["config"].clone()
}

// =============================================================================
// Config File Discovery
// =============================================================================

#[test]
fn runs_without_config_file() {
    let tmp = TempDir::new().unwrap();

    let config = effective_config(tmp.path(), tmp.path());
    assert_eq!(config["sources"].as_array().unwrap().len(), 0);
    assert_eq!(config["log_level"], "info");
}

#[test]
fn discovers_dotfile_config_in_current_dir() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".relnotes.toml"), r#"log_level = "debug""#).unwrap();

    let config = effective_config(tmp.path(), tmp.path());
    assert_eq!(config["log_level"], "debug");
    assert_eq!(config["sources"][0]["kind"], "project");
}

#[test]
fn discovers_config_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("nested").join("deep");
    fs::create_dir_all(&sub_dir).unwrap();
    fs::write(tmp.path().join("relnotes.toml"), r#"log_level = "warn""#).unwrap();

    let config = effective_config(tmp.path(), &sub_dir);
    assert_eq!(config["log_level"], "warn");
}

#[test]
fn dotfile_takes_precedence_over_regular_name() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".relnotes.toml"), r#"log_level = "debug""#).unwrap();
    fs::write(tmp.path().join("relnotes.toml"), r#"log_level = "error""#).unwrap();

    let config = effective_config(tmp.path(), tmp.path());
    assert_eq!(config["log_level"], "debug");
}

#[test]
fn closer_config_takes_precedence() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("packaging");
    fs::create_dir_all(&sub_dir).unwrap();
    fs::write(tmp.path().join(".relnotes.toml"), r#"log_level = "error""#).unwrap();
    fs::write(sub_dir.join(".relnotes.toml"), r#"log_level = "warn""#).unwrap();

    let config = effective_config(tmp.path(), &sub_dir);
    assert_eq!(config["log_level"], "warn");
}

#[test]
fn explicit_config_overrides_project_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".relnotes.toml"), "[render]\nindent_width = 4\n").unwrap();
    let explicit = tmp.path().join("ci.toml");
    fs::write(&explicit, "[render]\nindent_width = 1\n").unwrap();

    let output = cmd(tmp.path())
        .args(["-C", tmp.path().to_str().unwrap(), "--json", "info", "--config"])
        .arg(&explicit)
        .assert()
        .success();
    let json: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(json["config"]["render"]["indent_width"], 1);
    assert_eq!(json["config"]["sources"][1]["kind"], "explicit");
}

// =============================================================================
// Config Format Parsing
// =============================================================================

#[test]
fn parses_yaml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".relnotes.yaml"),
        "render:\n  base_level: 2\n  invalid_date: error\n",
    )
    .unwrap();

    let config = effective_config(tmp.path(), tmp.path());
    assert_eq!(config["render"]["base_level"], 2);
    assert_eq!(config["render"]["invalid_date"], "error");
}

#[test]
fn parses_json_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".relnotes.json"),
        r#"{"log_level": "warn", "render": {"indent_width": 3}}"#,
    )
    .unwrap();

    let config = effective_config(tmp.path(), tmp.path());
    assert_eq!(config["log_level"], "warn");
    assert_eq!(config["render"]["indent_width"], 3);
}

#[test]
fn toml_preferred_over_yaml_in_same_directory() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".relnotes.toml"), r#"log_level = "debug""#).unwrap();
    fs::write(tmp.path().join(".relnotes.yaml"), "log_level: error\n").unwrap();

    let config = effective_config(tmp.path(), tmp.path());
    assert_eq!(config["log_level"], "debug");
}

#[test]
fn invalid_toml_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".relnotes.toml"), "this is not [valid toml").unwrap();

    cmd(tmp.path())
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn invalid_date_policy_value_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".relnotes.toml"),
        "[render]\ninvalid_date = \"guess\"\n",
    )
    .unwrap();

    cmd(tmp.path())
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure();
}

#[test]
fn unknown_config_field_is_ignored() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".relnotes.toml"),
        "log_level = \"warn\"\nfuture_option = true\n",
    )
    .unwrap();

    let config = effective_config(tmp.path(), tmp.path());
    assert_eq!(config["log_level"], "warn");
}

// =============================================================================
// Render Settings Reach Convert
// =============================================================================

#[test]
fn render_section_changes_convert_layout() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".relnotes.toml"),
        "[render]\nbase_level = 1\nindent_width = 4\n",
    )
    .unwrap();

    cmd(tmp.path())
        .args(["-C", tmp.path().to_str().unwrap(), "convert"])
        .write_stdin(CHANGELOG)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("    <releases>\n"))
        .stdout(predicate::str::contains(
            "\n                    <li>Initial release</li>\n",
        ));
}

#[test]
fn strict_dates_reject_unparseable_heading() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("releases.xml");
    fs::write(
        tmp.path().join(".relnotes.toml"),
        "[render]\ninvalid_date = \"error\"\n",
    )
    .unwrap();

    cmd(tmp.path())
        .args(["-C", tmp.path().to_str().unwrap(), "convert", "-o"])
        .arg(&output)
        .write_stdin("2.0 - whenever 2020x 2020\n* thing\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("2.0"));

    assert!(!output.exists());
}

// =============================================================================
// Boundary Marker Tests
// =============================================================================

#[test]
fn git_boundary_stops_config_search() {
    let tmp = TempDir::new().unwrap();
    let parent = tmp.path().join("parent");
    let repo = parent.join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(parent.join(".relnotes.toml"), r#"log_level = "error""#).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();

    let config = effective_config(tmp.path(), &src);
    assert_eq!(config["log_level"], "info");
    assert_eq!(config["sources"].as_array().unwrap().len(), 0);
}

#[test]
fn config_in_same_dir_as_git_is_found() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();
    fs::write(repo.join(".relnotes.toml"), r#"log_level = "debug""#).unwrap();

    let config = effective_config(tmp.path(), &src);
    assert_eq!(config["log_level"], "debug");
}
