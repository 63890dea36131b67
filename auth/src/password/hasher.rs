use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// bcrypt only digests this many bytes of input.
const BCRYPT_MAX_PASSWORD_BYTES: usize = 72;

/// Adaptive password hashing.
///
/// New hashes are Argon2id PHC strings. Verification also accepts bcrypt
/// hashes (`$2a$`, `$2b$`, `$2y$`) so that credential stores provisioned with
/// bcrypt keep working. Both schemes compare digests in constant time.
/// Passwords longer than 72 bytes never match a bcrypt hash, since bcrypt
/// would otherwise ignore everything past that point.
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password with Argon2id and a random salt.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The scheme is chosen from the hash itself: bcrypt for `$2?$` prefixes,
    /// PHC parsing (Argon2) for everything else. The cost parameters embedded
    /// in the stored hash are honoured.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash` - The stored hash cannot be parsed
    /// * `VerificationFailed` - The hashing primitive itself failed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        if Self::is_bcrypt(hash) {
            return Self::verify_bcrypt(password, hash);
        }

        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }

    fn is_bcrypt(hash: &str) -> bool {
        BCRYPT_PREFIXES.iter().any(|prefix| hash.starts_with(prefix))
    }

    fn verify_bcrypt(password: &str, hash: &str) -> Result<bool, PasswordError> {
        if password.len() > BCRYPT_MAX_PASSWORD_BYTES {
            return Ok(false);
        }

        // bcrypt only fails on hashes it cannot split into cost, salt and digest.
        bcrypt::verify(password, hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");
        assert!(hash.starts_with("$argon2id$"));

        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));
        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("same").unwrap();
        let second = hasher.hash("same").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_bcrypt_hash() {
        let hasher = PasswordHasher::new();
        let hash = bcrypt::hash("correct", 4).expect("Failed to create bcrypt hash");

        assert!(hasher.verify("correct", &hash).unwrap());
        assert!(!hasher.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_bcrypt_rejects_password_past_byte_limit() {
        let hasher = PasswordHasher::new();
        let stored = format!("{}Y", "A".repeat(72));
        let submitted = format!("{}X", "A".repeat(72));
        let hash = bcrypt::hash(&stored, 4).expect("Failed to create bcrypt hash");

        assert!(!hasher.verify(&submitted, &hash).unwrap());
        assert!(!hasher.verify(&stored, &hash).unwrap());
    }

    #[test]
    fn test_bcrypt_accepts_password_at_limit() {
        let hasher = PasswordHasher::new();
        let password = "A".repeat(72);
        let hash = bcrypt::hash(&password, 4).expect("Failed to create bcrypt hash");

        assert!(hasher.verify(&password, &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();

        let result = hasher.verify("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }

    #[test]
    fn test_verify_truncated_bcrypt_hash() {
        let hasher = PasswordHasher::new();

        let result = hasher.verify("password", "$2b$10$tooshort");
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }
}
