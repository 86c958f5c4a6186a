use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::domain::user::models::AccessToken;
use crate::domain::user::models::Credentials;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn login<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let credentials = body.try_into_credentials()?;

    state
        .auth_service
        .login(credentials)
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::OK, token.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

impl LoginRequest {
    fn try_into_credentials(self) -> Result<Credentials, UserError> {
        Ok(Credentials::new(self.username, self.password)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}

impl From<AccessToken> for LoginResponseData {
    fn from(access_token: AccessToken) -> Self {
        Self {
            token: access_token.token,
            token_type: "Bearer",
            expires_at: access_token.expires_at,
        }
    }
}
