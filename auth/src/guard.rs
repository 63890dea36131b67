use std::sync::Arc;

use thiserror::Error;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Authorization scheme prefix expected on protected requests.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Identity of the caller, extracted from a verified token.
///
/// Scoped to a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
}

/// Why a bearer credential was refused.
///
/// All variants are reported to the caller as a plain "unauthorized"; the
/// variant only feeds logs through [`GuardError::reason`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("Missing bearer credential")]
    MissingCredential,

    #[error("Malformed bearer credential: {0}")]
    MalformedCredential(String),

    #[error("Credential signed with disallowed algorithm: {0}")]
    DisallowedAlgorithm(String),

    #[error("Credential signature is invalid")]
    InvalidSignature,

    #[error("Credential is expired")]
    ExpiredCredential,
}

impl GuardError {
    /// Stable, machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            GuardError::MissingCredential => "missing_credential",
            GuardError::MalformedCredential(_) => "malformed_credential",
            GuardError::DisallowedAlgorithm(_) | GuardError::InvalidSignature => {
                "invalid_signature"
            }
            GuardError::ExpiredCredential => "expired_credential",
        }
    }
}

impl From<JwtError> for GuardError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::DisallowedAlgorithm(alg) => GuardError::DisallowedAlgorithm(alg),
            JwtError::InvalidSignature | JwtError::UnknownKeyVersion(_) => {
                GuardError::InvalidSignature
            }
            JwtError::TokenExpired => GuardError::ExpiredCredential,
            other => GuardError::MalformedCredential(other.to_string()),
        }
    }
}

/// Validates bearer credentials on protected requests.
///
/// Framework-agnostic: the dispatch layer passes in the raw `Authorization`
/// value and decides what to do with the outcome.
#[derive(Clone)]
pub struct TokenGuard {
    jwt_handler: Arc<JwtHandler>,
}

impl TokenGuard {
    pub fn new(jwt_handler: Arc<JwtHandler>) -> Self {
        Self { jwt_handler }
    }

    /// Validate a raw `Authorization` header value.
    ///
    /// The prefix is checked before any token parsing, so a missing or
    /// non-bearer credential never reaches signature verification.
    ///
    /// # Errors
    /// * `MissingCredential` - No header, an empty header, or no bearer token
    /// * `MalformedCredential` - The token cannot be parsed or has an empty subject
    /// * `DisallowedAlgorithm` - The token header names a non-HMAC algorithm
    /// * `InvalidSignature` - Unknown key version or signature mismatch
    /// * `ExpiredCredential` - The token is past its `exp`
    pub fn validate(&self, authorization: Option<&str>) -> Result<Identity, GuardError> {
        let token = authorization
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(GuardError::MissingCredential)?;

        let claims = self.jwt_handler.decode(token)?;

        if claims.sub.is_empty() {
            return Err(GuardError::MalformedCredential(
                "empty subject claim".to_string(),
            ));
        }

        Ok(Identity {
            subject: claims.sub,
        })
    }
}
