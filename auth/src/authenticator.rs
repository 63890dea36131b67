use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::guard::TokenGuard;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SigningKeys;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Plaintext the decoy hash is computed from. Never compared for equality:
/// the decoy outcome is always discarded.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Authentication coordinator combining password verification and JWT generation.
///
/// Holds no mutable state and is shared across requests behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: Arc<JwtHandler>,
    token_lifetime: Duration,
    decoy_hash: String,
}

/// A freshly signed access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// JWT access token
    pub access_token: String,
    /// Key version the token was signed with
    pub key_version: String,
    pub expires_at: DateTime<Utc>,
}

/// Authenticator construction and issuance errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Token lifetime must be positive and yield a representable expiry, got {0} seconds")]
    InvalidTokenLifetime(i64),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `keys` - Signing key ring, already validated
    /// * `token_lifetime` - Validity window of issued tokens
    ///
    /// # Errors
    /// * `InvalidTokenLifetime` - `token_lifetime` is zero, negative, or pushes
    ///   the expiry past the range of a UTC timestamp
    /// * `PasswordError` - The decoy hash could not be computed
    pub fn new(keys: &SigningKeys, token_lifetime: Duration) -> Result<Self, AuthenticationError> {
        if token_lifetime <= Duration::zero()
            || Utc::now().checked_add_signed(token_lifetime).is_none()
        {
            return Err(AuthenticationError::InvalidTokenLifetime(
                token_lifetime.num_seconds(),
            ));
        }

        let password_hasher = PasswordHasher::new();
        let decoy_hash = password_hasher.hash(DECOY_PASSWORD)?;

        Ok(Self {
            password_hasher,
            jwt_handler: Arc::new(JwtHandler::new(keys)),
            token_lifetime,
            decoy_hash,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a submitted password against the stored hash of an account.
    ///
    /// `stored_hash` is `None` when the account does not exist. The password
    /// is then checked against a decoy hash and the result discarded, so an
    /// unknown account costs the same as a wrong password and yields the same
    /// `Ok(false)`.
    ///
    /// Blocks for the duration of an adaptive hash computation.
    ///
    /// # Errors
    /// * `PasswordError` - The stored hash is unreadable or hashing failed
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: Option<&str>,
    ) -> Result<bool, PasswordError> {
        match stored_hash {
            Some(hash) => self.password_hasher.verify(password, hash),
            None => {
                let _ = self.password_hasher.verify(password, &self.decoy_hash);
                Ok(false)
            }
        }
    }

    /// Sign an access token for `subject`, valid from now for the configured lifetime.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, subject: &str) -> Result<IssuedToken, JwtError> {
        let claims = Claims::for_subject(subject, self.token_lifetime)?;
        let access_token = self.jwt_handler.encode(&claims)?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| JwtError::EncodingFailed(format!("exp out of range: {}", claims.exp)))?;

        Ok(IssuedToken {
            access_token,
            key_version: self.jwt_handler.key_version().to_string(),
            expires_at,
        })
    }

    /// Guard that validates tokens issued by this authenticator.
    pub fn token_guard(&self) -> TokenGuard {
        TokenGuard::new(Arc::clone(&self.jwt_handler))
    }
}
