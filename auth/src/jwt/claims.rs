use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Access token claim set.
///
/// The key version travels in the JOSE header (`kid`), not in the claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username of the authenticated account)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for `subject`, valid for `lifetime` starting now.
    ///
    /// # Errors
    /// * `EncodingFailed` - The expiry falls outside the representable range
    pub fn for_subject(subject: impl ToString, lifetime: Duration) -> Result<Self, JwtError> {
        Self::issued_at(subject, Utc::now(), lifetime)
    }

    /// Create claims for `subject` issued at an explicit instant.
    ///
    /// # Errors
    /// * `EncodingFailed` - The expiry falls outside the representable range
    pub fn issued_at(
        subject: impl ToString,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, JwtError> {
        let expires_at = issued_at.checked_add_signed(lifetime).ok_or_else(|| {
            JwtError::EncodingFailed(format!(
                "token lifetime of {} seconds overflows the expiry",
                lifetime.num_seconds()
            ))
        })?;

        Ok(Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Expiration as a UTC instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// A token is only live while `exp` is strictly in the future.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_subject() {
        let claims = Claims::for_subject("alice", Duration::hours(24)).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_issued_at() {
        let issued_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::issued_at("bob", issued_at, Duration::minutes(5)).unwrap();

        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_300);
        assert_eq!(claims.expires_at(), DateTime::from_timestamp(1_700_000_300, 0));
    }

    #[test]
    fn test_overflowing_lifetime_is_an_error() {
        let result = Claims::for_subject("bob", Duration::hours(3_000_000_000));
        assert!(matches!(result, Err(JwtError::EncodingFailed(_))));
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims {
            sub: "alice".to_string(),
            iat: 0,
            exp: 1000,
        };

        assert!(!claims.is_expired(999));
        assert!(claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_missing_claims_fail_to_deserialize() {
        let result = serde_json::from_str::<Claims>(r#"{"sub":"alice","iat":1}"#);
        assert!(result.is_err());
    }
}
