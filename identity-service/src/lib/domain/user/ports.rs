use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Port for authentication use cases.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `credentials` - Validated username and plaintext password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `Validation` - Password exceeds the hashing input limit
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `StoreUnavailable` - User store timed out or is unreachable
    async fn signup(&self, credentials: Credentials) -> Result<User, UserError>;

    /// Authenticate a user and issue an access token.
    ///
    /// # Arguments
    /// * `credentials` - Validated username and plaintext password
    ///
    /// # Returns
    /// Signed access token and its expiry
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password (indistinguishable)
    /// * `StoreUnavailable` - User store timed out or is unreachable
    async fn login(&self, credentials: Credentials) -> Result<AccessToken, UserError>;

    /// Verify a bearer token at instant `now` and return its subject.
    ///
    /// Pure: never touches the user store.
    ///
    /// # Errors
    /// * `Unauthorized` - Token rejected for any reason
    fn authorize(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// Username uniqueness is enforced atomically by the store: of two
    /// concurrent creates with the same username exactly one succeeds.
    ///
    /// # Arguments
    /// * `user` - Username and password hash to store
    ///
    /// # Returns
    /// Created user entity with its assigned id
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `StoreUnavailable` - Store timed out or is unreachable
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by username.
    ///
    /// # Arguments
    /// * `username` - Username to search for (case-sensitive)
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store timed out or is unreachable
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
}
