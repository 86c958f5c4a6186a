use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::TokenClaims;
use super::errors::JwtError;

/// JWT token handler for issuing and verifying access tokens.
///
/// Signs with HS256 (HMAC with SHA-256) over a single shared secret and only
/// ever accepts HS256 on the way back in.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl JwtHandler {
    /// Minimum secret length in bytes (256 bits for HS256).
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `ttl` - Lifetime of issued tokens
    ///
    /// # Returns
    /// JwtHandler instance configured with HS256 algorithm
    ///
    /// # Errors
    /// * `InvalidSecret` - Secret is empty or shorter than `MIN_SECRET_LENGTH`
    /// * `InvalidLifetime` - `ttl` is not positive, or too large to add to the current time
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret("secret is empty".to_string()));
        }
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(JwtError::InvalidSecret(format!(
                "secret must be at least {} bytes, got {}",
                Self::MIN_SECRET_LENGTH,
                secret.len()
            )));
        }
        if ttl <= Duration::zero() {
            return Err(JwtError::InvalidLifetime(format!(
                "token lifetime must be positive, got {}s",
                ttl.num_seconds()
            )));
        }
        if Utc::now().checked_add_signed(ttl).is_none() {
            return Err(JwtError::InvalidLifetime(format!(
                "token lifetime of {}s is out of range",
                ttl.num_seconds()
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Build the claims a token issued for `subject` at `now` would carry.
    ///
    /// # Errors
    /// * `InvalidLifetime` - Expiry is not a representable instant
    pub fn claims_for(
        &self,
        subject: impl ToString,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, JwtError> {
        TokenClaims::new(subject, now, self.ttl)
    }

    /// Issue a signed token for `subject`, valid from `now` for the configured lifetime.
    ///
    /// Signing is deterministic: the same subject, instant and secret always
    /// produce the same token.
    ///
    /// # Errors
    /// * `InvalidLifetime` - Expiry is not a representable instant
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: impl ToString, now: DateTime<Utc>) -> Result<String, JwtError> {
        self.encode(&self.claims_for(subject, now)?)
    }

    /// Encode claims into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &TokenClaims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token's algorithm, signature and expiry at instant `now`.
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `Unauthorized` - Any failure: malformed, wrong algorithm, bad signature,
    ///   missing claims or expired. The reason is logged, not returned.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked against the caller's clock below.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data =
            decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "Token rejected");
                JwtError::Unauthorized
            })?;

        let claims = token_data.claims;

        if claims.exp <= claims.iat {
            tracing::debug!(
                iat = claims.iat,
                exp = claims.exp,
                "Token rejected: empty validity window"
            );
            return Err(JwtError::Unauthorized);
        }

        if claims.is_expired(now.timestamp()) {
            tracing::debug!(exp = claims.exp, "Token rejected: expired");
            return Err(JwtError::Unauthorized);
        }

        Ok(claims)
    }
}
