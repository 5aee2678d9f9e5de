pub mod admin;
pub mod auth;
pub mod password_reset;
pub mod registration;
pub mod user;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Validate, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(description = "Password of at least 6 characters.")]
pub struct ValidPassword {
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    value: String,
}

impl ValidPassword {
    pub fn value(&self) -> &str {
        &self.value
    }
}
