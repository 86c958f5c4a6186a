use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::AuthenticationResult;
use auth::Authenticator;
use auth::PasswordError;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::CredentialsError;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Password hashed once at construction and verified against when the
/// username is unknown, so both login failure paths cost one verification.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-users";

/// Outcome of checking credentials. Unknown users and wrong passwords both
/// end up as `Rejected`.
enum LoginOutcome {
    Authenticated(AuthenticationResult),
    Rejected,
}

/// Domain service implementation for signup, login and token authorization.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    decoy_hash: Arc<str>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token signing
    ///
    /// # Errors
    /// * `PasswordError` - Decoy hash could not be computed
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
    ) -> Result<Self, PasswordError> {
        let decoy_hash = authenticator.hash_password(DECOY_PASSWORD)?;

        Ok(Self {
            repository,
            authenticator,
            decoy_hash: Arc::from(decoy_hash),
        })
    }

    /// Verify the password off the async executor.
    async fn check_credentials(
        &self,
        user: Option<User>,
        password: String,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, UserError> {
        let authenticator = Arc::clone(&self.authenticator);
        let decoy_hash = Arc::clone(&self.decoy_hash);

        tokio::task::spawn_blocking(move || match user {
            Some(user) => {
                match authenticator.authenticate(&password, &user.password_hash, user.id, now) {
                    Ok(result) => Ok(LoginOutcome::Authenticated(result)),
                    Err(AuthenticationError::InvalidCredentials) => Ok(LoginOutcome::Rejected),
                    Err(AuthenticationError::PasswordError(e)) => {
                        Err(UserError::Hashing(e.to_string()))
                    }
                    Err(AuthenticationError::JwtError(e)) => {
                        Err(UserError::TokenIssuance(e.to_string()))
                    }
                }
            }
            None => {
                let _ = authenticator.verify_password(&password, &decoy_hash);
                Ok(LoginOutcome::Rejected)
            }
        })
        .await
        .map_err(|e| UserError::Hashing(e.to_string()))?
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn signup(&self, credentials: Credentials) -> Result<User, UserError> {
        let (username, password) = credentials.into_parts();

        let authenticator = Arc::clone(&self.authenticator);
        let password_hash =
            tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
                .await
                .map_err(|e| UserError::Hashing(e.to_string()))?
                .map_err(|e| match e {
                    PasswordError::InputTooLong { max, actual } => {
                        UserError::from(CredentialsError::PasswordTooLong { max, actual })
                    }
                    other => UserError::Hashing(other.to_string()),
                })?;

        let user = self
            .repository
            .create(NewUser::new(username, password_hash))
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    async fn login(&self, credentials: Credentials) -> Result<AccessToken, UserError> {
        let (username, password) = credentials.into_parts();

        let user = self.repository.find_by_username(&username).await?;

        match self.check_credentials(user, password, Utc::now()).await? {
            LoginOutcome::Authenticated(result) => {
                tracing::info!(
                    user_id = %result.claims.sub,
                    issued_at = ?result.claims.issued_at(),
                    "User logged in"
                );

                let expires_at = result
                    .claims
                    .expires_at()
                    .ok_or_else(|| UserError::TokenIssuance("expiry out of range".to_string()))?;

                Ok(AccessToken {
                    token: result.access_token,
                    expires_at,
                })
            }
            LoginOutcome::Rejected => {
                tracing::info!("Login rejected");
                Err(UserError::InvalidCredentials)
            }
        }
    }

    fn authorize(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, UserError> {
        let claims = self
            .authenticator
            .validate_token(token, now)
            .map_err(|_| UserError::Unauthorized)?;

        UserId::from_string(&claims.sub).map_err(|e| {
            tracing::warn!(error = %e, "Token subject is not a user id");
            UserError::Unauthorized
        })
    }
}
