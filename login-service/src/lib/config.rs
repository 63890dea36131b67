use std::collections::HashMap;
use std::env;
use std::time::Duration;

use auth::JwtError;
use auth::SigningKeys;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_key_version")]
    pub key_version: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
    /// Previous secrets by key version, accepted for verification only.
    #[serde(default)]
    pub retired_keys: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

fn default_idle_timeout_secs() -> u64 {
    300
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_lookup_timeout_ms() -> u64 {
    3000
}

fn default_key_version() -> String {
    "v1".to_string()
}

fn default_expiration_hours() -> i64 {
    24
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::default()
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        configuration.try_deserialize()
    }
}

impl DatabaseConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

impl JwtConfig {
    /// Build the signing key ring.
    ///
    /// # Errors
    /// * `MissingSecret` - The active or a retired secret is empty
    /// * `MissingKeyVersion` - A key version is empty
    /// * `DuplicateKeyVersion` - A retired key reuses the active version
    pub fn signing_keys(&self) -> Result<SigningKeys, JwtError> {
        self.retired_keys.iter().try_fold(
            SigningKeys::new(self.key_version.as_str(), self.secret.as_bytes())?,
            |keys, (version, secret)| keys.with_retired(version.as_str(), secret.as_bytes()),
        )
    }

    /// Validity window of issued tokens.
    ///
    /// # Errors
    /// * `ConfigError::Message` - `expiration_hours` does not fit a duration
    pub fn token_lifetime(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::try_hours(self.expiration_hours).ok_or_else(|| {
            ConfigError::Message(format!(
                "jwt.expiration_hours out of range: {}",
                self.expiration_hours
            ))
        })
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut retired: Vec<&String> = self.retired_keys.keys().collect();
        retired.sort_unstable();

        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("key_version", &self.key_version)
            .field("expiration_hours", &self.expiration_hours)
            .field("retired_keys", &retired)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            key_version: "v2".to_string(),
            expiration_hours: 24,
            retired_keys: HashMap::new(),
        }
    }

    #[test]
    fn test_empty_secret_is_fatal() {
        let result = jwt_config("").signing_keys();
        assert!(matches!(result, Err(JwtError::MissingSecret(_))));
    }

    #[test]
    fn test_retired_keys_are_loaded() {
        let mut config = jwt_config("current_secret");
        config
            .retired_keys
            .insert("v1".to_string(), "previous_secret".to_string());

        let keys = config.signing_keys().expect("Failed to build key ring");
        assert_eq!(keys.active_version(), "v2");
    }

    #[test]
    fn test_token_lifetime() {
        let lifetime = jwt_config("secret").token_lifetime().unwrap();
        assert_eq!(lifetime, chrono::Duration::hours(24));
    }

    #[test]
    fn test_out_of_range_expiration_is_an_error() {
        let mut config = jwt_config("secret");
        config.expiration_hours = i64::MAX;

        assert!(matches!(
            config.token_lifetime(),
            Err(ConfigError::Message(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", jwt_config("do_not_print_me"));
        assert!(!rendered.contains("do_not_print_me"));
    }
}
