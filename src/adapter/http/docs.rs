use axum::{Json, response::Html};
use utoipa::{
    Modify, OpenApi,
    openapi::{
        OpenApi as OpenApiDoc,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};

use crate::adapter::http::{
    app_error_impl::ErrorResponse,
    routes::{admin, auth, user},
    schema::{
        MessageResponse, ValidPassword,
        admin::{OverviewListResponse, SingleUserResponse, UserListResponse, UserOverviewResponse},
        auth::{AdminLoginRequest, CheckTokenResponse, LoginRequest, LoginResponse, TokenResponse, VerifyOtpRequest},
        password_reset::{ForgotPasswordRequest, ForgotPasswordResponse, ResetPasswordRequest, ResetTokenResponse},
        registration::{SignupCompleteResponse, SignupRequest, VerifySignupRequest},
        user::{ActivityResponse, UserResponse},
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut OpenApiDoc) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        auth::signup,
        auth::verify_signup,
        auth::login,
        auth::verify_login,
        auth::forgot_password,
        auth::verify_forgot,
        auth::reset_password,
        auth::logout,
        auth::check_token,
        user::get_profile,
        admin::admin_login,
        admin::all_users,
        admin::logged_in_users,
        admin::active_users,
        admin::users_overview,
        admin::users_by_location,
        admin::users_by_date_range,
        admin::top_active_users,
        admin::user_by_id
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            ValidPassword,
            SignupRequest,
            VerifySignupRequest,
            SignupCompleteResponse,
            LoginRequest,
            LoginResponse,
            VerifyOtpRequest,
            TokenResponse,
            CheckTokenResponse,
            AdminLoginRequest,
            ForgotPasswordRequest,
            ForgotPasswordResponse,
            ResetTokenResponse,
            ResetPasswordRequest,
            ActivityResponse,
            UserResponse,
            UserListResponse,
            SingleUserResponse,
            UserOverviewResponse,
            OverviewListResponse
        )
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<OpenApiDoc> {
    Json(ApiDoc::openapi())
}

pub async fn docs_ui() -> Html<&'static str> {
    Html(
        r#"
            <!doctype html>
            <html>
              <head>
                <title>otpgate API</title>
                <meta charset="utf-8">
                <meta name="viewport" content="width=device-width, initial-scale=1">
                <script src="https://unpkg.com/@stoplight/elements/web-components.min.js"></script>
                <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements/styles.min.css">
              </head>
              <body style="height: 100%; margin: 0;">
                <elements-api
                  apiDescriptionUrl="openapi.json"
                  basePath="/"
                  router="hash"
                />
              </body>
            </html>
        "#,
    )
}
