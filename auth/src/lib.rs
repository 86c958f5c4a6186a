//! Authentication utilities library
//!
//! Provides the credential primitives of the identity service:
//! - Password hashing (Argon2id, configurable work factor)
//! - Access token issuing and verification (HS256 JWT)
//! - Authentication coordination
//!
//! Nothing here touches HTTP or storage; services adapt these types at their edges.
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
//! ## JWT Tokens
//! ```
//! use auth::JwtHandler;
//! use chrono::{Duration, Utc};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24)).unwrap();
//! let now = Utc::now();
//! let token = handler.issue("user123", now).unwrap();
//! let claims = handler.verify(&token, now).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, HashingParams};
//! use chrono::{Duration, Utc};
//!
//! let auth = Authenticator::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::hours(24),
//!     HashingParams::default(),
//! )
//! .unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let now = Utc::now();
//! let result = auth.authenticate("password123", &hash, "user123", now).unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token, now).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenClaims;
pub use password::HashingParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
