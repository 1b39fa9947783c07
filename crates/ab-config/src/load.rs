//! Settings loading with provenance.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::resolve::{resolve_settings_path, ConfigSource};
use crate::settings::EngineSettings;
use crate::validate::{validate_settings, ValidationError};

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl ConfigError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::NotFound { .. } => 60,
            ConfigError::ParseError { .. } => 61,
            ConfigError::IoError { .. } => 62,
            ConfigError::ValidationError(err) => err.code(),
        }
    }
}

/// Validated settings plus where they came from.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub settings: EngineSettings,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Resolve, read, parse, and validate the engine settings.
///
/// Falls back to [`EngineSettings::default`] when no file is found.
pub fn load_settings(cli_path: Option<&Path>) -> Result<ResolvedSettings, ConfigError> {
    let resolved = resolve_settings_path(cli_path);

    let settings = match resolved.path.as_deref() {
        Some(path) => read_settings_file(path)?,
        None => EngineSettings::default(),
    };
    validate_settings(&settings)?;

    tracing::debug!(
        source = %resolved.source,
        path = ?resolved.path,
        "engine settings loaded"
    );

    Ok(ResolvedSettings {
        settings,
        path: resolved.path,
        source: resolved.source,
    })
}

/// Read and parse a settings file without validating it.
pub fn read_settings_file(path: &Path) -> Result<EngineSettings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}
