use axum::extract::rejection::JsonRejection;
use axum::http::header::InvalidHeaderValue;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    InvalidPayload(#[from] ValidationErrors),

    #[error(transparent)]
    JsonRejection(#[from] JsonRejection),

    #[error("User with this email or phone already exists")]
    DuplicateIdentity,

    #[error("No OTP request found for this email")]
    PendingRegistrationNotFound,

    #[error("Challenge not found")]
    ChallengeNotFound,

    #[error("Challenge expired")]
    ChallengeExpired,

    #[error("Challenge code mismatch")]
    ChallengeMismatch,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid admin secret")]
    InvalidAdminSecret,

    #[error("Invalid or expired password reset token")]
    InvalidResetProof,

    #[error("Password hashing failed")]
    PasswordHashError,

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Email send error: {0}")]
    EmailSendError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error(transparent)]
    DatabaseError(#[from] sqlx::Error),

    #[error(transparent)]
    InvalidHeader(#[from] InvalidHeaderValue),
}

impl AppError {
    /// Challenge failures share one outward message so callers cannot tell
    /// a wrong code from an expired or consumed one.
    pub fn is_challenge_failure(&self) -> bool {
        matches!(
            self,
            AppError::ChallengeNotFound | AppError::ChallengeExpired | AppError::ChallengeMismatch
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
