use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::adapter::http::schema::ValidPassword;
use crate::adapter::http::validation::{not_blank, ten_digit_phone, valid_email};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(
        length(min = 2, message = "Name must be at least 2 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    #[schema(example = "Asha Patil")]
    pub name: String,
    #[validate(custom(function = "valid_email", message = "Invalid email address"))]
    #[schema(format = Email, example = "asha@example.com")]
    pub email: String,
    #[schema(value_type = String, example = "secret123")]
    #[validate(nested)]
    pub password: ValidPassword,
    #[validate(custom(function = "ten_digit_phone", message = "Phone number must be exactly 10 digits"))]
    #[schema(example = "9876543210")]
    pub phone_number: String,
    #[validate(custom(function = "not_blank", message = "District is required"))]
    pub district: String,
    #[validate(custom(function = "not_blank", message = "Taluka is required"))]
    pub taluka: String,
    #[validate(custom(function = "not_blank", message = "Police station is required"))]
    pub police_station: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifySignupRequest {
    #[validate(custom(function = "valid_email", message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "not_blank", message = "OTP is required"))]
    #[schema(example = "482913")]
    pub otp: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupCompleteResponse {
    pub message: String,
    pub user_id: String,
}
