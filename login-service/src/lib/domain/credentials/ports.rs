use async_trait::async_trait;
use auth::IssuedToken;

use crate::credentials::errors::CredentialError;
use crate::credentials::models::Credential;
use crate::credentials::models::LoginOutcome;
use crate::credentials::models::StoredHash;
use crate::credentials::models::Username;

/// Port for credential domain service operations.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Check a credential against the stored hash of its account.
    ///
    /// # Returns
    /// `true` only if the account exists and the password matches. An unknown
    /// account and a wrong password both return `false`.
    ///
    /// # Errors
    /// * `DatabaseError` - Credential store failed
    /// * `LookupTimeout` - Credential store did not answer in time
    /// * `Password` - Stored hash is unreadable or hashing failed
    async fn verify_credentials(&self, credential: &Credential) -> Result<bool, CredentialError>;

    /// Issue an access token for an account that has already been verified.
    ///
    /// # Errors
    /// * `Token` - Token signing failed
    async fn issue_token(&self, username: &Username) -> Result<IssuedToken, CredentialError>;

    /// Verify a credential and, on success, issue a token.
    ///
    /// # Errors
    /// Any error of `verify_credentials` or `issue_token`.
    async fn login(&self, credential: &Credential) -> Result<LoginOutcome, CredentialError>;
}

/// Read access to stored password hashes.
#[async_trait]
pub trait CredentialRepository: Send + Sync + 'static {
    /// Retrieve the stored hash for a username.
    ///
    /// # Returns
    /// Optional stored hash (None if no such account)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_hash_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredHash>, CredentialError>;
}
