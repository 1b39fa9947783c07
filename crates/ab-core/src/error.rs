//! Error types for the statistics engine.
//!
//! Every failure here is an input-validity problem: the engine does no I/O,
//! so nothing is transient and nothing is worth retrying. Degenerate samples
//! (empty arms, zero variance) are not errors; they are handled where they occur.

use ab_config::ValidationError;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Parameter outside its mathematical domain (alpha, power, priors, ...).
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: &'static str, message: String },

    #[error("invalid sample for variation {id}: {message}")]
    InvalidSample { id: String, message: String },

    #[error("need at least {needed} variations, got {got}")]
    InsufficientVariations { needed: usize, got: usize },

    #[error("duplicate variation id: {0}")]
    DuplicateVariation(String),

    #[error("invalid settings: {0}")]
    Settings(#[from] ValidationError),
}

impl EngineError {
    /// Stable numeric code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            EngineError::InvalidArgument { .. } => 40,
            EngineError::InvalidSample { .. } => 41,
            EngineError::InsufficientVariations { .. } => 42,
            EngineError::DuplicateVariation(_) => 43,
            EngineError::Settings(err) => err.code(),
        }
    }

    pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        EngineError::InvalidArgument {
            name,
            message: message.into(),
        }
    }
}

/// Require `value` in the open interval (0, 1).
pub(crate) fn ensure_open_unit(name: &'static str, value: f64) -> Result<()> {
    if value.is_nan() || value <= 0.0 || value >= 1.0 {
        return Err(EngineError::invalid(
            name,
            format!("must be in (0, 1), got {value}"),
        ));
    }
    Ok(())
}

/// Require a finite, strictly positive `value`.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::invalid(
            name,
            format!("must be finite and > 0, got {value}"),
        ));
    }
    Ok(())
}
