use thiserror::Error;

/// Error type for JWT operations.
///
/// Construction errors (`MissingSecret`, `MissingKeyVersion`, `DuplicateKeyVersion`)
/// are configuration faults and should stop the process at startup. The
/// remaining variants describe why an inbound token was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("No signing secret configured for key version {0}")]
    MissingSecret(String),

    #[error("Signing key version must not be empty")]
    MissingKeyVersion,

    #[error("Signing key version {0} configured more than once")]
    DuplicateKeyVersion(String),

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token algorithm {0} is not accepted")]
    DisallowedAlgorithm(String),

    #[error("Token was signed with unknown key version {0}")]
    UnknownKeyVersion(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    TokenExpired,
}
