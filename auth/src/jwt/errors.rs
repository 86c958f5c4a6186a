use thiserror::Error;

/// Error type for JWT operations.
///
/// Every verification failure collapses into `Unauthorized`; the concrete
/// reason is only logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid signing secret: {0}")]
    InvalidSecret(String),

    #[error("Invalid token lifetime: {0}")]
    InvalidLifetime(String),
}
