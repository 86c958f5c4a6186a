use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenClaims;
use crate::password::HashingParams;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and JWT token handling. Holds no mutable state, so a
/// single instance can be shared across request tasks.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
    /// Claims encoded in `access_token`
    pub claims: TokenClaims,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `token_ttl` - Lifetime of issued tokens
    /// * `hashing` - Argon2id work factor for new password hashes
    ///
    /// # Returns
    /// Configured Authenticator instance
    ///
    /// # Errors
    /// * `JwtError` - Secret missing or too short, or lifetime not positive
    /// * `PasswordError` - Hashing parameters rejected
    pub fn new(
        jwt_secret: &[u8],
        token_ttl: Duration,
        hashing: HashingParams,
    ) -> Result<Self, AuthenticationError> {
        Ok(Self {
            password_hasher: PasswordHasher::with_params(hashing)?,
            jwt_handler: JwtHandler::new(jwt_secret, token_ttl)?,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed or input too long
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash without issuing a token.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and generate JWT token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identifier placed in the token's `sub` claim
    /// * `now` - Issue instant
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: impl ToString,
        now: DateTime<Utc>,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let claims = self.jwt_handler.claims_for(subject, now)?;
        let access_token = self.jwt_handler.encode(&claims)?;

        Ok(AuthenticationResult {
            access_token,
            claims,
        })
    }

    /// Generate JWT token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token(
        &self,
        subject: impl ToString,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        self.jwt_handler.issue(subject, now)
    }

    /// Validate and decode JWT token at instant `now`.
    ///
    /// # Errors
    /// * `Unauthorized` - Token is not acceptable for any reason
    pub fn validate_token(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, JwtError> {
        self.jwt_handler.verify(token, now)
    }
}
