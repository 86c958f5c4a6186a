use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Protected greeting. Only reachable through the bearer middleware.
pub async fn hello(
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<HelloResponseData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        HelloResponseData {
            message: "Hello, world!".to_string(),
            user_id: user.user_id.0,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelloResponseData {
    pub message: String,
    pub user_id: i64,
}
