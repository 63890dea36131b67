use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtHandler;
use auth::SigningKeys;
use login_service::credentials::errors::CredentialError;
use login_service::credentials::models::StoredHash;
use login_service::credentials::models::Username;
use login_service::credentials::ports::CredentialRepository;
use login_service::domain::credentials::service::CredentialService;
use login_service::inbound::http::router::cors_layer;
use login_service::inbound::http::router::create_router;
use tokio::sync::oneshot;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const KEY_VERSION: &str = "v1";

/// Credential store held in memory. Can be switched into a failing mode to
/// simulate an unreachable database.
#[derive(Default)]
pub struct InMemoryCredentialRepository {
    hashes: HashMap<String, String>,
    unavailable: bool,
}

impl InMemoryCredentialRepository {
    pub fn with_account(mut self, username: &str, hash: String) -> Self {
        self.hashes.insert(username.to_string(), hash);
        self
    }

    pub fn unavailable() -> Self {
        Self {
            hashes: HashMap::new(),
            unavailable: true,
        }
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn find_hash_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredHash>, CredentialError> {
        if self.unavailable {
            return Err(CredentialError::DatabaseError(
                "connection to postgres://secret@db refused".to_string(),
            ));
        }

        Ok(self
            .hashes
            .get(username.as_str())
            .map(|hash| StoredHash::new(username.clone(), hash.clone())))
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawn with a store holding `bob` / `correct`.
    pub async fn spawn() -> Self {
        let hash = test_authenticator()
            .hash_password("correct")
            .expect("Failed to hash password");

        Self::spawn_with(InMemoryCredentialRepository::default().with_account("bob", hash)).await
    }

    /// Spawn the application in a background task backed by `repository`.
    pub async fn spawn_with(repository: InMemoryCredentialRepository) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(test_authenticator());
        let token_guard = Arc::new(authenticator.token_guard());
        let credential_service = Arc::new(CredentialService::new(
            Arc::new(repository),
            authenticator,
            Duration::from_secs(5),
        ));

        let router = create_router(
            credential_service,
            token_guard,
            cors_layer(&["https://command.dulc3.tech".to_string()]).unwrap(),
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(&signing_keys()),
            shutdown: Some(shutdown_tx),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

pub fn signing_keys() -> SigningKeys {
    SigningKeys::new(KEY_VERSION, JWT_SECRET).expect("Failed to build signing keys")
}

pub fn test_authenticator() -> Authenticator {
    Authenticator::new(&signing_keys(), chrono::Duration::hours(24))
        .expect("Failed to build authenticator")
}
