use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::user::errors::UserError;

pub mod hello;
pub mod login;
pub mod signup;

/// Body of every 401 the service produces.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Body of every 422 caused by an unreadable request body.
pub const INVALID_BODY_MESSAGE: &str = "Request body must be a JSON object";

/// `Json` extractor whose rejections use the API envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Parser output stays in the logs.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Request body rejected");
        ApiError::UnprocessableEntity(INVALID_BODY_MESSAGE.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    ServiceUnavailable(String),
    UnprocessableEntity(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

/// Infrastructure details are logged here and never reach the client.
impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(_) | UserError::UsernameAlreadyExists(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::Unauthorized => ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()),
            UserError::StoreUnavailable(_) => {
                tracing::error!(error = %err, "User store unavailable");
                ApiError::ServiceUnavailable("Service temporarily unavailable".to_string())
            }
            UserError::DatabaseError(_) | UserError::Hashing(_) | UserError::TokenIssuance(_) => {
                tracing::error!(error = %err, "Request failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::errors::CredentialsError;
    use crate::user::errors::UsernameError;

    #[test]
    fn test_validation_and_duplicate_are_unprocessable() {
        assert!(matches!(
            ApiError::from(UserError::Validation(CredentialsError::InvalidUsername(
                UsernameError::Empty
            ))),
            ApiError::UnprocessableEntity(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::UsernameAlreadyExists("stone".to_string())),
            ApiError::UnprocessableEntity(_)
        ));
    }

    #[test]
    fn test_invalid_credentials_message_is_fixed() {
        assert_eq!(
            ApiError::from(UserError::InvalidCredentials),
            ApiError::Unauthorized("Incorrect username or password".to_string())
        );
    }

    #[test]
    fn test_infrastructure_errors_hide_details() {
        let unavailable = ApiError::from(UserError::StoreUnavailable(
            "connection refused at 10.0.0.5:5432".to_string(),
        ));
        assert_eq!(
            unavailable,
            ApiError::ServiceUnavailable("Service temporarily unavailable".to_string())
        );

        let internal = ApiError::from(UserError::DatabaseError(
            "relation \"users\" does not exist".to_string(),
        ));
        assert_eq!(
            internal,
            ApiError::InternalServerError("Internal server error".to_string())
        );
    }

    #[test]
    fn test_error_response_status() {
        let response = ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ApiError::ServiceUnavailable("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
