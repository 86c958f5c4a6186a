use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::user::errors::CredentialsError;
use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// Represents a registered user. Created once at signup and never mutated.
/// Has no `Serialize` impl: responses are built from explicit projections so the
/// password hash cannot reach a client.
#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// User unique identifier type, assigned by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from its string form (as carried in a token subject).
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a decimal integer
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        s.parse::<i64>()
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Non-empty; compared case-sensitively, exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Create a new valid username.
    ///
    /// # Errors
    /// * `Empty` - Username is the empty string
    pub fn new(username: String) -> Result<Self, UsernameError> {
        if username.is_empty() {
            return Err(UsernameError::Empty);
        }
        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username and plaintext password presented to Signup or Login.
///
/// Request-scoped; never persisted.
pub struct Credentials {
    username: Username,
    password: String,
}

impl Credentials {
    /// Validate raw request fields.
    ///
    /// # Errors
    /// * `InvalidUsername` - Username is empty
    /// * `EmptyPassword` - Password is empty
    pub fn new(username: String, password: String) -> Result<Self, CredentialsError> {
        let username = Username::new(username)?;
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn into_parts(self) -> (Username, String) {
        (self.username, self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Record handed to the repository; id and timestamp are assigned on insert.
#[derive(Clone)]
pub struct NewUser {
    pub username: Username,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(username: Username, password_hash: String) -> Self {
        Self {
            username,
            password_hash,
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Signed bearer token returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rejects_empty() {
        assert_eq!(Username::new(String::new()), Err(UsernameError::Empty));
    }

    #[test]
    fn test_username_is_case_sensitive() {
        let lower = Username::new("stone".to_string()).unwrap();
        let upper = Username::new("Stone".to_string()).unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_credentials_validation() {
        assert!(Credentials::new("stone".to_string(), "1234".to_string()).is_ok());

        assert_eq!(
            Credentials::new(String::new(), "1234".to_string()).unwrap_err(),
            CredentialsError::InvalidUsername(UsernameError::Empty)
        );
        assert_eq!(
            Credentials::new("stone".to_string(), String::new()).unwrap_err(),
            CredentialsError::EmptyPassword
        );
    }

    #[test]
    fn test_user_id_round_trips_through_subject() {
        let id = UserId(42);
        assert_eq!(UserId::from_string(&id.to_string()), Ok(id));
        assert!(UserId::from_string("not-a-number").is_err());
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let user = User {
            id: UserId(1),
            username: Username::new("stone".to_string()).unwrap(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };
        let credentials = Credentials::new("stone".to_string(), "1234".to_string()).unwrap();

        assert!(!format!("{:?}", user).contains("$argon2id$secret"));
        assert!(!format!("{:?}", credentials).contains("1234"));
    }
}
