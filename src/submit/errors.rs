//! Submission errors

use thiserror::Error;

use crate::schema::EntityKind;

/// Result type for submission operations
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Failure to hand a record to the API.
///
/// A refused record (non-201 answer) is not an error; it is reported as
/// `SubmitOutcome::Rejected`.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Transport-level failure (connect, timeout, body decode)
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API has no endpoint for this entity kind
    #[error("{0} records cannot be submitted on their own")]
    NotSubmittable(EntityKind),

    /// Submission attempted before a successful login
    #[error("not authenticated: log in before submitting")]
    NotAuthenticated,

    /// Login refused
    #[error("login failed with status {status}")]
    AuthFailed { status: u16 },

    /// An answer the client does not know how to read
    #[error("unexpected response from {endpoint}: status {status}")]
    UnexpectedStatus { endpoint: String, status: u16 },
}

impl SubmitError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SubmitError::Http(_) => "SUBMIT_HTTP",
            SubmitError::NotSubmittable(_) => "SUBMIT_NOT_SUBMITTABLE",
            SubmitError::NotAuthenticated => "SUBMIT_NOT_AUTHENTICATED",
            SubmitError::AuthFailed { .. } => "SUBMIT_AUTH_FAILED",
            SubmitError::UnexpectedStatus { .. } => "SUBMIT_UNEXPECTED_STATUS",
        }
    }
}
