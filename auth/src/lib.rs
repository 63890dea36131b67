//! Authentication utilities library
//!
//! Provides the credential and token primitives of the login service:
//! - Password hashing (Argon2id, with bcrypt verification for legacy hashes)
//! - JWT signing and verification under versioned HMAC keys
//! - Bearer token guard for protected requests
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Issuing and validating tokens
//! ```
//! use auth::{Authenticator, SigningKeys};
//! use chrono::Duration;
//!
//! let keys = SigningKeys::new("v1", b"secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(&keys, Duration::hours(24)).unwrap();
//!
//! let issued = auth.issue_token("alice").unwrap();
//!
//! let identity = auth
//!     .token_guard()
//!     .validate(Some(&format!("Bearer {}", issued.access_token)))
//!     .unwrap();
//! assert_eq!(identity.subject, "alice");
//! ```

pub mod authenticator;
pub mod guard;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::IssuedToken;
pub use guard::GuardError;
pub use guard::Identity;
pub use guard::TokenGuard;
pub use guard::BEARER_PREFIX;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SigningKeys;
pub use password::PasswordError;
pub use password::PasswordHasher;
