//! Experiment statistics configuration loading and validation.
//!
//! This crate provides:
//! - Typed engine settings (significance, power, priors, Monte Carlo budgets)
//! - Settings resolution (CLI → env → XDG → system → defaults)
//! - Semantic validation of every tunable

pub mod load;
pub mod resolve;
pub mod settings;
pub mod validate;

pub use load::{load_settings, ConfigError, ResolvedSettings};
pub use resolve::{resolve_settings_path, ConfigSource, SettingsPath};
pub use settings::EngineSettings;
pub use validate::{validate_settings, ValidationError, ValidationResult};

/// Schema version for settings files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
