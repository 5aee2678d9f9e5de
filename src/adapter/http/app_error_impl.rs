use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::app_error::AppError;

pub const INVALID_OTP_MESSAGE: &str = "Invalid or expired OTP";

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, Option<String>) {
        match self {
            AppError::InvalidId(_) | AppError::Validation(_) | AppError::InvalidResetProof => {
                (StatusCode::BAD_REQUEST, Some(self.to_string()))
            }
            AppError::InvalidPayload(errors) => (StatusCode::BAD_REQUEST, Some(errors.to_string())),
            AppError::JsonRejection(rejection) => (StatusCode::BAD_REQUEST, Some(rejection.body_text())),
            err if err.is_challenge_failure() => (StatusCode::BAD_REQUEST, Some(INVALID_OTP_MESSAGE.to_string())),
            AppError::DuplicateIdentity => (StatusCode::CONFLICT, Some(self.to_string())),
            AppError::PendingRegistrationNotFound | AppError::UserNotFound => {
                (StatusCode::NOT_FOUND, Some(self.to_string()))
            }
            AppError::InvalidCredentials | AppError::Unauthorized | AppError::InvalidAdminSecret => {
                (StatusCode::UNAUTHORIZED, Some(self.to_string()))
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, Some(self.to_string())),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, None),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let message = match message {
            Some(msg) => msg,
            None => {
                tracing::error!(error = %self, "Request failed");
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
