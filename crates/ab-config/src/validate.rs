//! Settings validation errors and semantic validation.

use thiserror::Error;

use crate::settings::EngineSettings;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Settings validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate engine settings semantically.
pub fn validate_settings(settings: &EngineSettings) -> ValidationResult<()> {
    if settings.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    validate_open_unit("alpha", settings.alpha)?;
    validate_open_unit("power", settings.power)?;
    validate_open_unit("confidence_level", settings.confidence_level)?;
    validate_open_unit("srm_alpha", settings.srm_alpha)?;
    validate_positive("prior_alpha", settings.prior_alpha)?;
    validate_positive("prior_beta", settings.prior_beta)?;

    if !(0.0..=1.0).contains(&settings.bandit_epsilon) {
        return Err(ValidationError::InvalidValue {
            field: "bandit_epsilon".to_string(),
            message: format!("Must be in [0, 1], got {}", settings.bandit_epsilon),
        });
    }

    if settings.sequential_look_step.is_nan()
        || settings.sequential_look_step <= 0.0
        || settings.sequential_look_step > 1.0
    {
        return Err(ValidationError::InvalidValue {
            field: "sequential_look_step".to_string(),
            message: format!("Must be in (0, 1], got {}", settings.sequential_look_step),
        });
    }

    validate_nonzero_count("monte_carlo_samples", settings.monte_carlo_samples)?;
    validate_nonzero_count("bandit_rounds", settings.bandit_rounds)?;

    Ok(())
}

fn validate_open_unit(field: &str, value: f64) -> ValidationResult<()> {
    if value.is_nan() || value <= 0.0 || value >= 1.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be in (0, 1), got {}", value),
        });
    }
    Ok(())
}

fn validate_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be finite and > 0, got {}", value),
        });
    }
    Ok(())
}

fn validate_nonzero_count(field: &str, value: usize) -> ValidationResult<()> {
    if value == 0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "Must be at least 1".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(validate_settings(&EngineSettings::default()).is_ok());
    }

    #[test]
    fn alpha_out_of_range_rejected() {
        for alpha in [0.0, 1.0, -0.1, f64::NAN] {
            let s = EngineSettings::default().with_alpha(alpha);
            let err = validate_settings(&s).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "alpha"));
            assert_eq!(err.code(), 65);
        }
    }

    #[test]
    fn non_positive_prior_rejected() {
        let s = EngineSettings::default().with_prior(0.0, 1.0);
        assert!(validate_settings(&s).is_err());
        let s = EngineSettings::default().with_prior(1.0, f64::INFINITY);
        assert!(validate_settings(&s).is_err());
    }

    #[test]
    fn epsilon_bounds_inclusive() {
        assert!(validate_settings(&EngineSettings::default().with_bandit_epsilon(0.0)).is_ok());
        assert!(validate_settings(&EngineSettings::default().with_bandit_epsilon(1.0)).is_ok());
        assert!(validate_settings(&EngineSettings::default().with_bandit_epsilon(1.5)).is_err());
    }

    #[test]
    fn zero_monte_carlo_samples_rejected() {
        let s = EngineSettings::default().with_monte_carlo_samples(0);
        assert!(validate_settings(&s).is_err());
    }

    #[test]
    fn version_mismatch_detected() {
        let s = EngineSettings {
            schema_version: "0.9.0".to_string(),
            ..EngineSettings::default()
        };
        let err = validate_settings(&s).unwrap_err();
        assert_eq!(err.code(), 66);
    }
}
