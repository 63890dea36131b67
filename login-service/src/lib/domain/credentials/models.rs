use std::fmt;

use auth::IssuedToken;

use crate::credentials::errors::CredentialInputError;

/// Username value type
///
/// Only emptiness is rejected. Any other string is looked up as-is and a
/// malformed name simply matches no account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Create a new username.
    ///
    /// # Errors
    /// * `EmptyUsername` - The string is empty
    pub fn new(username: String) -> Result<Self, CredentialInputError> {
        if username.is_empty() {
            return Err(CredentialInputError::EmptyUsername);
        }
        Ok(Self(username))
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Submitted plaintext password.
///
/// Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// # Errors
    /// * `EmptyPassword` - The string is empty
    pub fn new(password: String) -> Result<Self, CredentialInputError> {
        if password.is_empty() {
            return Err(CredentialInputError::EmptyPassword);
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Login credential, alive for the duration of a single request.
#[derive(Debug, Clone)]
pub struct Credential {
    pub username: Username,
    pub password: Password,
}

impl Credential {
    /// Validate raw login input.
    ///
    /// # Errors
    /// * `EmptyUsername` - Username is empty
    /// * `EmptyPassword` - Password is empty
    pub fn new(username: String, password: String) -> Result<Self, CredentialInputError> {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }
}

/// Password hash as persisted for an account. Read-only in this service.
#[derive(Clone)]
pub struct StoredHash {
    pub username: Username,
    pub hash: String,
}

impl StoredHash {
    pub fn new(username: Username, hash: String) -> Self {
        Self { username, hash }
    }
}

impl fmt::Debug for StoredHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredHash")
            .field("username", &self.username)
            .field("hash", &"<redacted>")
            .finish()
    }
}

/// Result of a login attempt.
///
/// Unknown account and wrong password both end in `Rejected`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(IssuedToken),
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_requires_both_fields() {
        assert_eq!(
            Credential::new(String::new(), "pw".to_string()).unwrap_err(),
            CredentialInputError::EmptyUsername
        );
        assert_eq!(
            Credential::new("bob".to_string(), String::new()).unwrap_err(),
            CredentialInputError::EmptyPassword
        );
    }

    #[test]
    fn test_unusual_usernames_are_accepted() {
        let username = Username::new("o'brien; --".to_string()).unwrap();
        assert_eq!(username.as_str(), "o'brien; --");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credential = Credential::new("bob".to_string(), "hunter2".to_string()).unwrap();
        let stored = StoredHash::new(
            credential.username.clone(),
            "$argon2id$v=19$secret".to_string(),
        );

        assert!(!format!("{:?}", credential).contains("hunter2"));
        assert!(!format!("{:?}", stored).contains("argon2id"));
    }
}
