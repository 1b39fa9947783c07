//! Environment-driven settings discovery.
//!
//! Kept in its own test binary with a single test: the steps mutate
//! process-wide environment variables and must not interleave.

use ab_config::resolve::{ENV_CONFIG_DIR, ENV_SETTINGS_PATH, SETTINGS_FILENAME};
use ab_config::{load_settings, resolve_settings_path, ConfigSource};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn environment_steps_follow_resolution_order() {
    let xdg = TempDir::new().expect("tempdir");
    std::env::set_var("XDG_CONFIG_HOME", xdg.path());

    let direct_dir = TempDir::new().expect("tempdir");
    let direct = direct_dir.path().join("custom.json");
    fs::write(&direct, r#"{"alpha": 0.01}"#).expect("write settings");

    let config_dir = TempDir::new().expect("tempdir");
    let in_dir = config_dir.path().join(SETTINGS_FILENAME);
    fs::write(&in_dir, r#"{"alpha": 0.02}"#).expect("write settings");

    // Direct path beats the directory.
    std::env::set_var(ENV_SETTINGS_PATH, &direct);
    std::env::set_var(ENV_CONFIG_DIR, config_dir.path());
    let resolved = resolve_settings_path(None);
    assert_eq!(resolved.source, ConfigSource::Environment);
    assert_eq!(resolved.path.as_deref(), Some(direct.as_path()));
    let loaded = load_settings(None).expect("load settings");
    assert_eq!(loaded.settings.alpha, 0.01);

    // CLI path still wins over both.
    let resolved = resolve_settings_path(Some(Path::new("/nonexistent/cli.json")));
    assert_eq!(resolved.source, ConfigSource::CliArgument);

    // A missing direct path falls through to the directory.
    std::env::set_var(ENV_SETTINGS_PATH, direct_dir.path().join("missing.json"));
    let resolved = resolve_settings_path(None);
    assert_eq!(resolved.source, ConfigSource::Environment);
    assert_eq!(resolved.path.as_deref(), Some(in_dir.as_path()));
    let loaded = load_settings(None).expect("load settings");
    assert_eq!(loaded.settings.alpha, 0.02);

    // Directory without a settings file falls through past the environment.
    std::env::remove_var(ENV_SETTINGS_PATH);
    std::env::set_var(ENV_CONFIG_DIR, xdg.path());
    let resolved = resolve_settings_path(None);
    assert_ne!(resolved.source, ConfigSource::Environment);

    std::env::remove_var(ENV_CONFIG_DIR);
    std::env::remove_var("XDG_CONFIG_HOME");
}
