use std::path::PathBuf;

use tempfile::TempDir;
use ticalabash::config::{Config, ConfigError};

/// Test that Config::default() produces the expected values.
#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert!(config.assets.dir.is_none());
    assert!(config.runners.dir.is_none());
    assert!(config.runners.overrides.is_empty());
    assert_eq!(config.logging.level, "info");
}

/// Test that Config::config_path() returns a path ending with the expected filename.
#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("ticalabash/config.toml"));
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_full_file_parses() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[assets]
dir = "/opt/ticalabash/assets"

[runners]
dir = "/opt/ticalabash/runners"

[runners.overrides]
run_ios = "/usr/local/bin/ios-build"

[logging]
level = "ticalabash=debug"
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();

    assert_eq!(
        config.assets.dir,
        Some(PathBuf::from("/opt/ticalabash/assets"))
    );
    assert_eq!(
        config.runners.script_path("run_ios", None),
        PathBuf::from("/usr/local/bin/ios-build")
    );
    assert_eq!(
        config.runners.script_path("run_android", None),
        PathBuf::from("/opt/ticalabash/runners/run_android")
    );
    assert_eq!(config.logging.level, "ticalabash=debug");
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[runners]\ndir = \"/runners\"\n").unwrap();

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.logging.level, "info");
    assert!(config.assets.dir.is_none());
}

#[test]
fn test_invalid_toml_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "invalid { toml }").unwrap();

    match Config::load_from(&path).unwrap_err() {
        ConfigError::ParseError { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("Expected ParseError, got {other:?}"),
    }
}

#[test]
fn test_validation_fails_empty_override_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[runners.overrides]\nrun_ios = \"\"\n").unwrap();

    match Config::load_from(&path).unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("run_ios"));
        }
        other => panic!("Expected ValidationError, got {other:?}"),
    }
}

#[test]
fn test_validation_fails_blank_log_level() {
    let mut config = Config::default();
    config.logging.level = "  ".to_string();

    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}
