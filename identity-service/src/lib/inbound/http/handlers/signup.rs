use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::User;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn signup<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    JsonBody(body): JsonBody<SignupRequest>,
) -> Result<ApiSuccess<SignupResponseData>, ApiError> {
    let credentials = body.try_into_credentials()?;

    state
        .auth_service
        .signup(credentials)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for signing up (raw JSON)
///
/// Missing fields deserialize as empty and fail validation like empty ones.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

impl SignupRequest {
    fn try_into_credentials(self) -> Result<Credentials, UserError> {
        Ok(Credentials::new(self.username, self.password)?)
    }
}

/// Public projection of a newly created user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupResponseData {
    pub id: i64,
    pub username: String,
}

impl From<&User> for SignupResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::Username;

    #[test]
    fn test_response_omits_password_hash() {
        let user = User {
            id: UserId(1),
            username: Username::new("stone".to_string()).unwrap(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(SignupResponseData::from(&user)).unwrap();
        assert_eq!(value, serde_json::json!({ "id": 1, "username": "stone" }));
    }
}
