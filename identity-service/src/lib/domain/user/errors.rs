use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid user id: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,
}

/// Error for signup/login input validation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Password too long: maximum {max} bytes, got {actual}")]
    PasswordTooLong { max: usize, actual: usize },
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("Invalid input: {0}")]
    Validation(#[from] CredentialsError),

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    /// Unknown username and wrong password alike.
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// Any bearer token rejection.
    #[error("Unauthorized")]
    Unauthorized,

    // Infrastructure errors
    #[error("User store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),
}
