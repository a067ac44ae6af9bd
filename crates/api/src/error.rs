use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::errors::{InvalidGathering, RatingRejection};
use serde::Serialize;
use thiserror::Error;

/// User-facing message for an unknown gathering.
pub const GATHERING_NOT_FOUND: &str = "평가를 찾을 수 없습니다.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn gathering_not_found() -> Self {
        ApiError::NotFound(GATHERING_NOT_FOUND.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "서버 오류가 발생했습니다.".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::gathering_not_found(),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => ApiError::Conflict("Resource already exists".into()),
                Some("23503") => ApiError::gathering_not_found(),
                _ => ApiError::Internal(format!("Database error: {}", db_err)),
            },
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect();
        messages.sort();
        messages.dedup();

        let message = match messages.as_slice() {
            [] => "입력값이 올바르지 않습니다.".to_string(),
            [only] => only.clone(),
            // Several missing fields share one message; prefer it.
            many => many
                .iter()
                .find(|m| m.as_str() == "필수 항목을 모두 입력해주세요.")
                .unwrap_or(&many[0])
                .clone(),
        };

        ApiError::Validation(message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Malformed request body");
        ApiError::Validation("요청 형식이 올바르지 않습니다.".to_string())
    }
}

impl From<RatingRejection> for ApiError {
    fn from(rejection: RatingRejection) -> Self {
        ApiError::Validation(rejection.to_string())
    }
}

impl From<InvalidGathering> for ApiError {
    fn from(err: InvalidGathering) -> Self {
        ApiError::Validation(err.to_string())
    }
}
