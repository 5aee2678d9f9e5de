use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::adapter::http::schema::ValidPassword;
use crate::adapter::http::validation::{not_blank, valid_email};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(custom(function = "valid_email", message = "Invalid email address"))]
    #[schema(format = Email, example = "asha@example.com")]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetTokenResponse {
    pub message: String,
    pub reset_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(custom(function = "not_blank", message = "userId is required"))]
    pub user_id: String,
    #[schema(value_type = String)]
    #[validate(nested)]
    pub new_password: ValidPassword,
    #[validate(custom(function = "not_blank", message = "resetToken is required"))]
    pub reset_token: String,
}
