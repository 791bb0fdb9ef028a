//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::fit::FitConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate a fit configuration semantically.
pub fn validate_fit_config(config: &FitConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    if config.max_iter == 0 {
        return Err(ValidationError::InvalidValue {
            field: "max_iter".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    if let Some(convergence) = &config.convergence {
        if !convergence.tolerance.is_finite() || convergence.tolerance <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "convergence.tolerance".to_string(),
                message: format!("Must be a positive finite number, got {}", convergence.tolerance),
            });
        }
    }

    Ok(())
}
