//! API error types.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use z83_models::ModelError;
use z83_store::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already registered")]
    DuplicateEmail,

    /// Unknown email and wrong password look the same to the client.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing authorization token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::DuplicateEmail | ApiError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MissingToken | ApiError::InvalidToken(_) | ApiError::ExpiredToken => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::DuplicateEmail => "DUPLICATE_EMAIL",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::MissingToken => "MISSING_TOKEN",
            ApiError::InvalidToken(_) => "INVALID_TOKEN",
            ApiError::ExpiredToken => "EXPIRED_TOKEN",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::RateLimited => "RATE_LIMITED",
            ApiError::Internal(_) | ApiError::Store(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => ApiError::DuplicateEmail,
            StoreError::NotFound(what) => ApiError::NotFound(what),
            other => ApiError::Store(other),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Validation(err.body_text())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side failures keep their detail in the logs only
        let detail = match &self {
            ApiError::Internal(_) | ApiError::Store(_) => {
                error!(error = %self, "Request failed");
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            detail,
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::DuplicateEmail.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidCredentials.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::ExpiredToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::InvalidToken("bad signature".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::from(StoreError::Unavailable("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_errors_mapped() {
        assert!(matches!(ApiError::from(StoreError::DuplicateEmail), ApiError::DuplicateEmail));
        assert!(matches!(
            ApiError::from(StoreError::NotFound("job 1".into())),
            ApiError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_internal_detail_hidden() {
        let response =
            ApiError::from(StoreError::Unavailable("connection refused at 10.0.0.5".into()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["detail"], "An internal error occurred");
        assert_eq!(body["code"], "INTERNAL_ERROR");
    }

    #[test]
    fn test_invalid_token_reason_not_in_message() {
        let err = ApiError::InvalidToken("InvalidSignature".into());
        assert_eq!(err.to_string(), "Invalid token");
    }
}
