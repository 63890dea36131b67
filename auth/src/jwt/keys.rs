use std::collections::HashMap;
use std::fmt;

use super::errors::JwtError;

/// Symmetric signing secrets indexed by key version.
///
/// Exactly one version is active and signs new tokens. Retired versions are
/// kept only to verify tokens issued before a rotation until they expire.
/// Loaded once at startup and immutable afterwards.
#[derive(Clone)]
pub struct SigningKeys {
    active_version: String,
    secrets: HashMap<String, Vec<u8>>,
}

impl SigningKeys {
    /// Create a key ring with a single active key.
    ///
    /// # Errors
    /// * `MissingKeyVersion` - `version` is empty
    /// * `MissingSecret` - `secret` is empty
    pub fn new(version: impl Into<String>, secret: &[u8]) -> Result<Self, JwtError> {
        let version = Self::checked_entry(version.into(), secret)?;

        let mut secrets = HashMap::new();
        secrets.insert(version.clone(), secret.to_vec());

        Ok(Self {
            active_version: version,
            secrets,
        })
    }

    /// Add a retired key that still verifies, but never signs, tokens.
    ///
    /// # Errors
    /// * `MissingKeyVersion` - `version` is empty
    /// * `MissingSecret` - `secret` is empty
    /// * `DuplicateKeyVersion` - `version` is already present
    pub fn with_retired(mut self, version: impl Into<String>, secret: &[u8]) -> Result<Self, JwtError> {
        let version = Self::checked_entry(version.into(), secret)?;

        if self.secrets.contains_key(&version) {
            return Err(JwtError::DuplicateKeyVersion(version));
        }

        self.secrets.insert(version, secret.to_vec());
        Ok(self)
    }

    fn checked_entry(version: String, secret: &[u8]) -> Result<String, JwtError> {
        if version.trim().is_empty() {
            return Err(JwtError::MissingKeyVersion);
        }
        if secret.is_empty() {
            return Err(JwtError::MissingSecret(version));
        }
        Ok(version)
    }

    /// Version that signs newly issued tokens.
    pub fn active_version(&self) -> &str {
        &self.active_version
    }

    pub(crate) fn active_secret(&self) -> &[u8] {
        // The active entry is inserted by `new` and never removed.
        &self.secrets[&self.active_version]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.secrets
            .iter()
            .map(|(version, secret)| (version.as_str(), secret.as_slice()))
    }
}

impl fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut versions: Vec<&str> = self.secrets.keys().map(String::as_str).collect();
        versions.sort_unstable();

        f.debug_struct("SigningKeys")
            .field("active_version", &self.active_version)
            .field("versions", &versions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_is_rejected() {
        let result = SigningKeys::new("v1", b"");
        assert_eq!(result.unwrap_err(), JwtError::MissingSecret("v1".to_string()));
    }

    #[test]
    fn test_empty_version_is_rejected() {
        let result = SigningKeys::new("  ", b"secret");
        assert_eq!(result.unwrap_err(), JwtError::MissingKeyVersion);
    }

    #[test]
    fn test_retired_keys() {
        let keys = SigningKeys::new("v2", b"new_secret")
            .and_then(|keys| keys.with_retired("v1", b"old_secret"))
            .expect("Failed to build key ring");

        assert_eq!(keys.active_version(), "v2");
        assert_eq!(keys.active_secret(), b"new_secret");
        assert_eq!(keys.iter().count(), 2);
    }

    #[test]
    fn test_duplicate_version_is_rejected() {
        let result = SigningKeys::new("v1", b"secret").and_then(|keys| keys.with_retired("v1", b"other"));
        assert_eq!(result.unwrap_err(), JwtError::DuplicateKeyVersion("v1".to_string()));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let keys = SigningKeys::new("v1", b"super_secret_value").unwrap();
        let rendered = format!("{:?}", keys);

        assert!(rendered.contains("v1"));
        assert!(!rendered.contains("super_secret_value"));
    }
}
