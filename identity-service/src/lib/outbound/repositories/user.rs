use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USERNAME_UNIQUE_CONSTRAINT: &str = "users_username_key";

pub struct PostgresUserRepository {
    pool: PgPool,
    query_timeout: Duration,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username)
            .map_err(|e| UserError::DatabaseError(format!("Stored user {}: {}", row.id, e)))?;

        Ok(User {
            id: UserId(row.id),
            username,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Run a query under the configured timeout.
    async fn bounded<T, F>(
        &self,
        query: F,
        on_error: impl FnOnce(sqlx::Error) -> UserError,
    ) -> Result<T, UserError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(on_error),
            Err(_) => Err(UserError::StoreUnavailable(format!(
                "query exceeded {}ms",
                self.query_timeout.as_millis()
            ))),
        }
    }
}

/// Connectivity failures are retryable; everything else is a database error.
fn map_sqlx_error(e: sqlx::Error) -> UserError {
    match e {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => UserError::StoreUnavailable(e.to_string()),
        _ => UserError::DatabaseError(e.to_string()),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let query = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .fetch_one(&self.pool);

        let row = self
            .bounded(query, |e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation()
                        && db_err.constraint() == Some(USERNAME_UNIQUE_CONSTRAINT)
                    {
                        return UserError::UsernameAlreadyExists(
                            user.username.as_str().to_string(),
                        );
                    }
                }
                map_sqlx_error(e)
            })
            .await?;

        User::try_from(row)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let query = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool);

        self.bounded(query, map_sqlx_error)
            .await?
            .map(User::try_from)
            .transpose()
    }
}
