use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::adapter::http::schema::user::UserResponse;
use crate::adapter::http::validation::not_blank;

/// Either credentials or a previously issued token. A still-valid token
/// skips the emailed code.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "asha@example.com")]
    pub email: Option<String>,
    #[schema(example = "secret123")]
    pub password: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[validate(custom(function = "not_blank", message = "userId is required"))]
    pub user_id: String,
    #[validate(custom(function = "not_blank", message = "OTP is required"))]
    #[schema(example = "482913")]
    pub otp: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckTokenResponse {
    pub valid: bool,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminLoginRequest {
    pub secret: String,
}
