use std::time::Duration;

use thiserror::Error;

/// Error for login input validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialInputError {
    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Password must not be empty")]
    EmptyPassword,
}

/// Top-level error for credential operations.
///
/// A failed login is not an error: it is reported as a negative outcome.
/// Every variant except `InvalidInput` is an internal failure.
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    #[error("Invalid login input: {0}")]
    InvalidInput(#[from] CredentialInputError),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] auth::JwtError),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Credential lookup timed out after {0:?}")]
    LookupTimeout(Duration),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl CredentialError {
    /// Whether the failure lies with the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CredentialError::InvalidInput(_))
    }
}
