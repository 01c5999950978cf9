mod common;

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

use common::write_config;

/// Run the binary inside `dir` with no user-level configuration
fn run_cli(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_markup-validator"))
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env_remove("MARKUP_VALIDATOR_DEFAULT_VALIDATOR")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run markup-validator")
}

const BASE_CONFIG: &str = r#"
default_validator = "tidy"

[validators.tidy]
processor = "tidy"

[validators.w3c]
processor = "w3c"
"#;

#[test]
fn test_cli_prints_wiring() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), "base.toml", BASE_CONFIG);

    let output = run_cli(temp_dir.path(), &["--config", config.to_str().unwrap()]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        println!("STDOUT: {}", stdout);
        println!("STDERR: {}", stderr);
    }

    assert!(output.status.success());
    assert!(stdout.contains("markup_validator.tidy_validator -> markup_validator.tidy_processor"));
    assert!(stdout.contains("markup_validator.w3c_validator -> markup_validator.w3c_processor"));
    assert!(stdout.contains("default_validator -> markup_validator.tidy_validator"));
}

#[test]
fn test_cli_discovers_project_config() {
    let temp_dir = TempDir::new().unwrap();
    write_config(temp_dir.path(), "markup-validator.toml", BASE_CONFIG);

    let output = run_cli(temp_dir.path(), &["--format", "json"]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["default_validator"], "tidy");
    assert_eq!(parsed["validators"].as_array().unwrap().len(), 2);
}

#[test]
fn test_cli_flag_overrides_environment() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), "base.toml", BASE_CONFIG);
    let config = config.to_str().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_markup-validator"))
        .args(["--config", config, "--format", "json"])
        .current_dir(temp_dir.path())
        .env("MARKUP_VALIDATOR_DEFAULT_VALIDATOR", "w3c")
        .output()
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["default_validator"], "w3c");

    let output = Command::new(env!("CARGO_BIN_EXE_markup-validator"))
        .args(["--config", config, "--format", "json", "-d", "tidy"])
        .current_dir(temp_dir.path())
        .env("MARKUP_VALIDATOR_DEFAULT_VALIDATOR", "w3c")
        .output()
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["default_validator"], "tidy");
}

#[test]
fn test_cli_unknown_processor_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), "base.toml", BASE_CONFIG);

    let output = run_cli(
        temp_dir.path(),
        &["--config", config.to_str().unwrap(), "--processor", "tidy"],
    );

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown processor 'w3c' for the 'w3c' validator"));
}

#[test]
fn test_cli_unknown_default_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), "base.toml", BASE_CONFIG);

    let output = run_cli(
        temp_dir.path(),
        &["--config", config.to_str().unwrap(), "-d", "strict"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("there is no 'strict' validator defined"));
}

#[test]
fn test_cli_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();

    let output = run_cli(temp_dir.path(), &["--config", "missing.toml"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration file does not exist"));
}

#[test]
fn test_cli_help() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_cli(temp_dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
}
