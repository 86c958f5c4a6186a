use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Claims carried by an access token.
///
/// Deliberately minimal: the authenticated subject and the validity window.
/// Timestamps are Unix seconds as in RFC 7519.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (stringified user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    /// Create claims for a subject, valid for `ttl` starting at `issued_at`.
    ///
    /// # Arguments
    /// * `subject` - Authenticated subject identifier
    /// * `issued_at` - Issue instant
    /// * `ttl` - Validity period, must be positive
    ///
    /// # Errors
    /// * `InvalidLifetime` - `issued_at + ttl` is not a representable instant
    pub fn new(
        subject: impl ToString,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        let expires_at = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            JwtError::InvalidLifetime(format!(
                "expiry overflows when issuing at {}",
                issued_at.timestamp()
            ))
        })?;

        Ok(Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Check if token is expired.
    ///
    /// A token is valid only strictly before its expiry instant.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = TokenClaims::new(42, now, Duration::hours(24)).unwrap();

        assert_eq!(claims.subject(), "42");
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60); // 24 hours
        assert_eq!(claims.issued_at(), Some(now));
        assert_eq!(claims.expires_at(), Some(now + Duration::hours(24)));
    }

    #[test]
    fn test_new_claims_overflowing_expiry() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let result = TokenClaims::new(42, now, Duration::weeks(1_000_000_000));

        assert!(matches!(result, Err(JwtError::InvalidLifetime(_))));
    }

    #[test]
    fn test_is_expired() {
        let claims = TokenClaims {
            sub: "1".to_string(),
            iat: 0,
            exp: 1000,
        };

        assert!(!claims.is_expired(0));
        assert!(!claims.is_expired(999)); // Not expired
        assert!(claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001)); // Expired
    }

    #[test]
    fn test_serialized_field_names() {
        let claims = TokenClaims {
            sub: "7".to_string(),
            iat: 10,
            exp: 20,
        };

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value, serde_json::json!({ "sub": "7", "iat": 10, "exp": 20 }));
    }
}
