//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::submit::SubmitError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout, files)
    IoError,
    /// API transport failure
    SubmitError,
    /// Login refused
    AuthFailed,
    /// `check` found rows that would not load
    CheckFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SEED_CLI_CONFIG_ERROR",
            Self::IoError => "SEED_CLI_IO_ERROR",
            Self::SubmitError => "SEED_CLI_SUBMIT_ERROR",
            Self::AuthFailed => "SEED_CLI_AUTH_FAILED",
            Self::CheckFailed => "SEED_CLI_CHECK_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Check found failing rows or could not read the whole file
    pub fn check_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::CheckFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<SubmitError> for CliError {
    fn from(e: SubmitError) -> Self {
        let code = match e {
            SubmitError::AuthFailed { .. } => CliErrorCode::AuthFailed,
            _ => CliErrorCode::SubmitError,
        };
        Self::new(code, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_has_code() {
        let err = CliError::config_error("missing username");
        assert_eq!(err.to_string(), "SEED_CLI_CONFIG_ERROR: missing username");
    }

    #[test]
    fn test_auth_failure_maps_to_its_own_code() {
        let err = CliError::from(SubmitError::AuthFailed { status: 401 });
        assert_eq!(err.code(), &CliErrorCode::AuthFailed);
        let err = CliError::from(SubmitError::NotAuthenticated);
        assert_eq!(err.code_str(), "SEED_CLI_SUBMIT_ERROR");
    }
}
