//! Exit codes for the hmm-core CLI.
//!
//! Ranges:
//! - 0: success
//! - 10-19: user/input errors (fixable by changing arguments or files)
//! - 20-29: internal errors (bugs, should be reported)

use hmm_config::ValidationError;

use crate::error::EstimateError;

/// Exit codes for hmm-core commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command completed.
    Clean = 0,

    /// Invalid arguments.
    ArgsError = 10,

    /// Input file missing, unreadable or not valid JSON.
    IoError = 11,

    /// Fit configuration rejected.
    ConfigError = 12,

    /// Estimation failed (dimension, parameter or degeneracy error).
    EstimationError = 13,

    /// Internal error (bug - please report).
    InternalError = 20,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Codes 10-19.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Error code name (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::IoError => "ERR_IO",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::EstimationError => "ERR_ESTIMATION",
            ExitCode::InternalError => "ERR_INTERNAL",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

impl From<&EstimateError> for ExitCode {
    fn from(_: &EstimateError) -> Self {
        ExitCode::EstimationError
    }
}

impl From<&ValidationError> for ExitCode {
    fn from(err: &ValidationError) -> Self {
        match err {
            ValidationError::IoError(_) => ExitCode::IoError,
            _ => ExitCode::ConfigError,
        }
    }
}
