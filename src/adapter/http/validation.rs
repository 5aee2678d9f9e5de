use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Json, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::application::app_error::AppError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

/// Query string extractor that reports malformed parameters as `AppError`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(ValidQuery(value))
    }
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

pub fn ten_digit_phone(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.len() == 10 && value.chars().all(|c| c.is_ascii_digit()) {
        return Ok(());
    }
    Err(ValidationError::new("phone_not_ten_digits"))
}

/// Emails are normalized later, so surrounding whitespace is tolerated here.
pub fn valid_email(value: &str) -> Result<(), ValidationError> {
    if serde_email::is_valid_email(value.trim()) {
        return Ok(());
    }
    Err(ValidationError::new("email"))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{not_blank, ten_digit_phone, valid_email};

    #[rstest]
    #[case("9876543210", true)]
    #[case(" 9876543210 ", true)]
    #[case("987654321", false)]
    #[case("98765432101", false)]
    #[case("98765x3210", false)]
    #[case("", false)]
    fn phone_must_be_ten_digits(#[case] phone: &str, #[case] ok: bool) {
        assert_eq!(ten_digit_phone(phone).is_ok(), ok);
    }

    #[rstest]
    #[case("Pune", true)]
    #[case("   ", false)]
    #[case("", false)]
    fn blank_fields_are_rejected(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(not_blank(value).is_ok(), ok);
    }

    #[rstest]
    #[case("alice@example.com", true)]
    #[case("  Alice@Example.com ", true)]
    #[case("alice", false)]
    #[case("", false)]
    fn email_shape_is_checked(#[case] email: &str, #[case] ok: bool) {
        assert_eq!(valid_email(email).is_ok(), ok);
    }
}
