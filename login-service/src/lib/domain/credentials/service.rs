use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use auth::IssuedToken;

use crate::credentials::errors::CredentialError;
use crate::credentials::models::Credential;
use crate::credentials::models::LoginOutcome;
use crate::credentials::models::StoredHash;
use crate::credentials::models::Username;
use crate::credentials::ports::CredentialRepository;
use crate::credentials::ports::CredentialServicePort;

/// Domain service implementation for login operations.
///
/// Concrete implementation of CredentialServicePort with dependency injection.
pub struct CredentialService<CR>
where
    CR: CredentialRepository,
{
    repository: Arc<CR>,
    authenticator: Arc<Authenticator>,
    lookup_timeout: Duration,
}

impl<CR> CredentialService<CR>
where
    CR: CredentialRepository,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store
    /// * `authenticator` - Password verification and token signing
    /// * `lookup_timeout` - Upper bound on a single credential lookup
    pub fn new(
        repository: Arc<CR>,
        authenticator: Arc<Authenticator>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            authenticator,
            lookup_timeout,
        }
    }

    async fn lookup(&self, username: &Username) -> Result<Option<StoredHash>, CredentialError> {
        tokio::time::timeout(
            self.lookup_timeout,
            self.repository.find_hash_by_username(username),
        )
        .await
        .map_err(|_| CredentialError::LookupTimeout(self.lookup_timeout))?
    }
}

#[async_trait]
impl<CR> CredentialServicePort for CredentialService<CR>
where
    CR: CredentialRepository,
{
    async fn verify_credentials(&self, credential: &Credential) -> Result<bool, CredentialError> {
        let stored_hash = self.lookup(&credential.username).await?.map(|s| s.hash);

        // Adaptive hashing is CPU-bound; keep it off the async workers.
        let authenticator = Arc::clone(&self.authenticator);
        let password = credential.password.clone();
        let matched = tokio::task::spawn_blocking(move || {
            authenticator.verify_password(password.expose(), stored_hash.as_deref())
        })
        .await
        .map_err(|e| CredentialError::Unknown(format!("Password verification task failed: {}", e)))??;

        Ok(matched)
    }

    async fn issue_token(&self, username: &Username) -> Result<IssuedToken, CredentialError> {
        let issued = self.authenticator.issue_token(username.as_str())?;

        tracing::debug!(
            key_version = %issued.key_version,
            expires_at = %issued.expires_at,
            "Access token issued"
        );

        Ok(issued)
    }

    async fn login(&self, credential: &Credential) -> Result<LoginOutcome, CredentialError> {
        if !self.verify_credentials(credential).await? {
            tracing::info!("Login rejected");
            return Ok(LoginOutcome::Rejected);
        }

        let issued = self.issue_token(&credential.username).await?;
        tracing::info!("Login succeeded");

        Ok(LoginOutcome::Authenticated(issued))
    }
}
