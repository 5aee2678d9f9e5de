use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapter::http::app_error_impl::ErrorResponse;
use crate::adapter::http::middleware::extractor::{AuthUser, ClientAddr};
use crate::adapter::http::schema::MessageResponse;
use crate::adapter::http::schema::auth::{
    CheckTokenResponse, LoginRequest, LoginResponse, TokenResponse, VerifyOtpRequest,
};
use crate::adapter::http::schema::password_reset::{
    ForgotPasswordRequest, ForgotPasswordResponse, ResetPasswordRequest, ResetTokenResponse,
};
use crate::adapter::http::schema::registration::{SignupCompleteResponse, SignupRequest, VerifySignupRequest};
use crate::adapter::http::validation::ValidJson;
use crate::application::app_error::{AppError, AppResult};
use crate::application::dto::auth::{LoginDTO, LoginOutcomeDTO, LogoutDTO, VerifyOtpDTO};
use crate::application::dto::id::IdDTO;
use crate::application::dto::password_reset::{
    RequestPasswordResetDTO, ResetPasswordDTO, VerifyPasswordResetDTO,
};
use crate::application::dto::registration::{PromoteRegistrationDTO, StageRegistrationDTO};
use crate::application::interactors::auth::{LoginInteractor, LogoutInteractor, VerifyLoginInteractor};
use crate::application::interactors::password_reset::{
    RequestPasswordResetInteractor, ResetPasswordInteractor, VerifyPasswordResetInteractor,
};
use crate::application::interactors::registration::{PromoteRegistrationInteractor, StageRegistrationInteractor};
use crate::application::interactors::users::GetProfileInteractor;
use crate::infra::config::AppConfig;

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    request_body(
        content = SignupRequest,
        example = json!(
            {
                "name": "Asha Patil",
                "email": "asha@example.com",
                "password": "secret123",
                "phoneNumber": "9876543210",
                "district": "Pune",
                "taluka": "Haveli",
                "policeStation": "Wagholi"
            }
        )
    ),
    responses(
        (
            status = 200,
            description = "Code sent, registration pending",
            body = MessageResponse,
            example = json!(
                {
                    "message": "New OTP sent to email. Please verify to complete signup."
                }
            )
        ),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (
            status = 409,
            description = "Email or phone already registered",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "User with this email or phone already exists"
                }
            )
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn signup(
    interactor: StageRegistrationInteractor,
    State(config): State<Arc<AppConfig>>,
    ValidJson(payload): ValidJson<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    let dto = StageRegistrationDTO {
        name: payload.name,
        email: payload.email,
        password: payload.password.value().to_string(),
        phone_number: payload.phone_number,
        district: payload.district,
        taluka: payload.taluka,
        police_station: payload.police_station,
        ttl: config.otp.ttl_seconds,
    };
    interactor.execute(dto).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new(
            "New OTP sent to email. Please verify to complete signup.",
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-signup-otp",
    tag = "Auth",
    request_body(
        content = VerifySignupRequest,
        example = json!({ "email": "asha@example.com", "otp": "482913" })
    ),
    responses(
        (
            status = 201,
            description = "Account created",
            body = SignupCompleteResponse,
            example = json!(
                {
                    "message": "OTP verified. Signup complete.",
                    "userId": "0192f1a4-7c3e-7b1a-9d2e-6f0c8e4b2a11"
                }
            )
        ),
        (
            status = 400,
            description = "Invalid or expired code",
            body = ErrorResponse,
            example = json!({ "error": "Invalid or expired OTP" })
        ),
        (status = 404, description = "No pending signup for this email", body = ErrorResponse),
        (status = 409, description = "Email or phone taken meanwhile", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn verify_signup(
    interactor: PromoteRegistrationInteractor,
    ValidJson(payload): ValidJson<VerifySignupRequest>,
) -> AppResult<impl IntoResponse> {
    let dto = PromoteRegistrationDTO {
        email: payload.email,
        code: payload.otp,
    };
    let user_id = interactor.execute(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(SignupCompleteResponse {
            message: "OTP verified. Signup complete.".to_string(),
            user_id: user_id.id,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body(
        content = LoginRequest,
        example = json!({ "email": "asha@example.com", "password": "secret123" })
    ),
    responses(
        (
            status = 200,
            description = "Code sent, or a still-valid token was resumed",
            body = LoginResponse,
            example = json!(
                {
                    "message": "OTP sent to your email",
                    "userId": "0192f1a4-7c3e-7b1a-9d2e-6f0c8e4b2a11"
                }
            )
        ),
        (
            status = 401,
            description = "Invalid email or password",
            body = ErrorResponse,
            example = json!({ "error": "Invalid credentials" })
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn login(
    interactor: LoginInteractor,
    State(config): State<Arc<AppConfig>>,
    ClientAddr(origin): ClientAddr,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let dto = LoginDTO {
        email: payload.email,
        password: payload.password,
        token: payload.token,
        origin,
        ttl: config.otp.ttl_seconds,
    };
    let response = match interactor.execute(dto).await? {
        LoginOutcomeDTO::ChallengeIssued { user_id } => LoginResponse {
            message: "OTP sent to your email".to_string(),
            user_id: Some(user_id),
            token: None,
        },
        LoginOutcomeDTO::Resumed { token } => LoginResponse {
            message: "Already logged in with valid token".to_string(),
            user_id: None,
            token: Some(token),
        },
    };
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-login-otp",
    tag = "Auth",
    request_body(content = VerifyOtpRequest),
    responses(
        (status = 200, description = "Session token issued", body = TokenResponse),
        (
            status = 400,
            description = "Invalid or expired code",
            body = ErrorResponse,
            example = json!({ "error": "Invalid or expired OTP" })
        ),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn verify_login(
    interactor: VerifyLoginInteractor,
    State(config): State<Arc<AppConfig>>,
    ValidJson(payload): ValidJson<VerifyOtpRequest>,
) -> AppResult<impl IntoResponse> {
    let dto = VerifyOtpDTO {
        user_id: payload.user_id,
        code: payload.otp,
        ttl: config.token.session_ttl_seconds,
    };
    let token = interactor.execute(dto).await?;
    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            message: "Login successful".to_string(),
            token: token.token,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Auth",
    request_body(content = ForgotPasswordRequest, example = json!({ "email": "asha@example.com" })),
    responses(
        (status = 200, description = "Reset code sent", body = ForgotPasswordResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn forgot_password(
    interactor: RequestPasswordResetInteractor,
    State(config): State<Arc<AppConfig>>,
    ValidJson(payload): ValidJson<ForgotPasswordRequest>,
) -> AppResult<impl IntoResponse> {
    let dto = RequestPasswordResetDTO {
        email: payload.email,
        ttl: config.otp.ttl_seconds,
    };
    let user_id = interactor.execute(dto).await?;
    Ok((
        StatusCode::OK,
        Json(ForgotPasswordResponse {
            message: "OTP sent to email for password reset".to_string(),
            user_id: user_id.id,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-forgot-otp",
    tag = "Auth",
    request_body(content = VerifyOtpRequest),
    responses(
        (
            status = 200,
            description = "Code accepted; reset token issued",
            body = ResetTokenResponse
        ),
        (
            status = 400,
            description = "Invalid or expired code",
            body = ErrorResponse,
            example = json!({ "error": "Invalid or expired OTP" })
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn verify_forgot(
    interactor: VerifyPasswordResetInteractor,
    State(config): State<Arc<AppConfig>>,
    ValidJson(payload): ValidJson<VerifyOtpRequest>,
) -> AppResult<impl IntoResponse> {
    let dto = VerifyPasswordResetDTO {
        user_id: payload.user_id,
        code: payload.otp,
        ttl: config.token.reset_proof_ttl_seconds,
    };
    let proof = interactor.execute(dto).await?;
    Ok((
        StatusCode::OK,
        Json(ResetTokenResponse {
            message: "OTP verified. You can now reset your password.".to_string(),
            reset_token: proof.token,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "Auth",
    request_body(content = ResetPasswordRequest),
    responses(
        (
            status = 200,
            description = "Password changed",
            body = MessageResponse,
            example = json!({ "message": "Password has been reset successfully" })
        ),
        (
            status = 400,
            description = "Missing, expired or already used reset token",
            body = ErrorResponse,
            example = json!({ "error": "Invalid or expired password reset token" })
        ),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn reset_password(
    interactor: ResetPasswordInteractor,
    ValidJson(payload): ValidJson<ResetPasswordRequest>,
) -> AppResult<impl IntoResponse> {
    let dto = ResetPasswordDTO {
        user_id: payload.user_id,
        reset_token: payload.reset_token,
        password: payload.new_password.value().to_string(),
    };
    interactor.execute(dto).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Password has been reset successfully")),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (
            status = 200,
            description = "Logged out successfully",
            body = MessageResponse,
            example = json!({ "message": "Logged out successfully" })
        ),
        (
            status = 401,
            description = "Missing or invalid token",
            body = ErrorResponse,
            example = json!({ "error": "Not authorized" })
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn logout(
    auth_user: AuthUser,
    interactor: LogoutInteractor,
    ClientAddr(origin): ClientAddr,
) -> AppResult<impl IntoResponse> {
    let dto = LogoutDTO {
        user_id: auth_user.user_id,
        origin,
    };
    interactor.execute(dto).await?;
    Ok((StatusCode::OK, Json(MessageResponse::new("Logged out successfully"))))
}

#[utoipa::path(
    get,
    path = "/api/auth/check-token",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid", body = CheckTokenResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn check_token(auth_user: AuthUser, interactor: GetProfileInteractor) -> AppResult<impl IntoResponse> {
    let dto = IdDTO { id: auth_user.user_id };
    let user = interactor.execute(dto).await.map_err(|err| match err {
        AppError::UserNotFound | AppError::InvalidId(_) => AppError::Unauthorized,
        other => other,
    })?;
    Ok((
        StatusCode::OK,
        Json(CheckTokenResponse {
            valid: true,
            user: user.into(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rstest::rstest;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::infra::app::create_app;
    use crate::tests::fixtures::{TestEnv, env};
    use crate::tests::helpers::{SequenceOtpGenerator, json_request, response_json, wait_for_emails};

    async fn call(env: &TestEnv, method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> (axum::http::StatusCode, Value) {
        let app = create_app(&env.config, env.app_state());
        let response = app.oneshot(json_request(method, uri, body, token)).await.unwrap();
        response_json(response).await
    }

    fn signup_body(email: &str, phone: &str) -> Value {
        json!({
            "name": "Asha Patil",
            "email": email,
            "password": "secret123",
            "phoneNumber": phone,
            "district": "Pune",
            "taluka": "Haveli",
            "policeStation": "Wagholi"
        })
    }

    // Signup, confirm, log in, confirm the login code, use the token.
    #[rstest]
    #[tokio::test]
    async fn full_signup_and_login_flow(env: TestEnv) {
        let (status, _) = call(&env, "POST", "/api/auth/signup", Some(signup_body("asha@example.com", "9876543210")), None).await;
        assert_eq!(status, 200);

        let emails = wait_for_emails(&env.email, 1).await;
        assert!(emails[0].body.contains(&SequenceOtpGenerator::nth(0)));

        let (status, json) = call(
            &env,
            "POST",
            "/api/auth/verify-signup-otp",
            Some(json!({ "email": "asha@example.com", "otp": SequenceOtpGenerator::nth(0) })),
            None,
        )
        .await;
        assert_eq!(status, 201);
        let user_id = json["userId"].as_str().unwrap().to_string();

        let (status, json) = call(
            &env,
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "asha@example.com", "password": "secret123" })),
            None,
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(json["userId"], user_id.as_str());
        assert!(json.get("token").is_none());

        let (status, json) = call(
            &env,
            "POST",
            "/api/auth/verify-login-otp",
            Some(json!({ "userId": user_id, "otp": env.otp.last() })),
            None,
        )
        .await;
        assert_eq!(status, 200);
        let token = json["token"].as_str().unwrap().to_string();

        let (status, json) = call(&env, "GET", "/api/auth/check-token", None, Some(&token)).await;
        assert_eq!(status, 200);
        assert_eq!(json["valid"], true);
        assert_eq!(json["user"]["email"], "asha@example.com");
        assert!(json["user"].get("password").is_none());
        assert_eq!(json["user"]["loginHistory"][0]["ip"], "203.0.113.9");
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_signup_payload_is_rejected(env: TestEnv) {
        let mut body = signup_body("asha@example.com", "12345");
        body["name"] = json!("A");

        let (status, json) = call(&env, "POST", "/api/auth/signup", Some(body), None).await;

        assert_eq!(status, 400);
        let message = json["error"].as_str().unwrap();
        assert!(message.contains("phone_number"), "{message}");
        assert!(env.email.sent().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_signup_conflicts(env: TestEnv) {
        env.seed_user("asha@example.com", "9876543210", "secret123").await;

        let (status, json) = call(&env, "POST", "/api/auth/signup", Some(signup_body("Asha@Example.com ", "9000000000")), None).await;

        assert_eq!(status, 409);
        assert_eq!(json["error"], "User with this email or phone already exists");
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_and_expired_codes_look_the_same(env: TestEnv) {
        let user = env.seed_user("asha@example.com", "9876543210", "secret123").await;
        let login = json!({ "email": "asha@example.com", "password": "secret123" });
        call(&env, "POST", "/api/auth/login", Some(login), None).await;
        let code = env.otp.last();

        let wrong = json!({ "userId": user.id.to_string(), "otp": "000000" });
        let (wrong_status, wrong_json) = call(&env, "POST", "/api/auth/verify-login-otp", Some(wrong), None).await;

        env.clock.advance(Duration::seconds(601));
        let late = json!({ "userId": user.id.to_string(), "otp": code });
        let (late_status, late_json) = call(&env, "POST", "/api/auth/verify-login-otp", Some(late), None).await;

        assert_eq!(wrong_status, 400);
        assert_eq!(late_status, 400);
        assert_eq!(wrong_json, late_json);
        assert_eq!(late_json["error"], "Invalid or expired OTP");
    }

    #[rstest]
    #[tokio::test]
    async fn valid_token_skips_the_code(env: TestEnv) {
        let user = env.seed_user("asha@example.com", "9876543210", "secret123").await;
        let token = env.session_token(&user);

        let (status, json) = call(&env, "POST", "/api/auth/login", Some(json!({ "token": token })), None).await;

        assert_eq!(status, 200);
        assert_eq!(json["token"], token.as_str());
        assert!(env.email.sent().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn bad_password_is_unauthorized(env: TestEnv) {
        env.seed_user("asha@example.com", "9876543210", "secret123").await;

        let body = json!({ "email": "asha@example.com", "password": "nope-nope" });
        let (status, json) = call(&env, "POST", "/api/auth/login", Some(body), None).await;

        assert_eq!(status, 401);
        assert_eq!(json["error"], "Invalid credentials");
    }

    #[rstest]
    #[tokio::test]
    async fn password_reset_flow(env: TestEnv) {
        let user = env.seed_user("asha@example.com", "9876543210", "secret123").await;

        let (status, json) = call(&env, "POST", "/api/auth/forgot-password", Some(json!({ "email": "asha@example.com" })), None).await;
        assert_eq!(status, 200);
        assert_eq!(json["userId"], user.id.to_string().as_str());

        let verify = json!({ "userId": user.id.to_string(), "otp": env.otp.last() });
        let (status, json) = call(&env, "POST", "/api/auth/verify-forgot-otp", Some(verify), None).await;
        assert_eq!(status, 200);
        let reset_token = json["resetToken"].as_str().unwrap().to_string();

        let reset = json!({ "userId": user.id.to_string(), "newPassword": "brand-new", "resetToken": reset_token });
        let (status, _) = call(&env, "POST", "/api/auth/reset-password", Some(reset.clone()), None).await;
        assert_eq!(status, 200);

        let (status, json) = call(&env, "POST", "/api/auth/reset-password", Some(reset), None).await;
        assert_eq!(status, 400);
        assert_eq!(json["error"], "Invalid or expired password reset token");

        let login = json!({ "email": "asha@example.com", "password": "brand-new" });
        let (status, _) = call(&env, "POST", "/api/auth/login", Some(login), None).await;
        assert_eq!(status, 200);
    }

    #[rstest]
    #[tokio::test]
    async fn forgot_password_for_unknown_email_is_not_found(env: TestEnv) {
        let (status, _) = call(&env, "POST", "/api/auth/forgot-password", Some(json!({ "email": "ghost@example.com" })), None).await;

        assert_eq!(status, 404);
    }

    #[rstest]
    #[tokio::test]
    async fn logout_requires_token_and_records_event(env: TestEnv) {
        let user = env.seed_user("asha@example.com", "9876543210", "secret123").await;

        let (status, _) = call(&env, "POST", "/api/auth/logout", None, None).await;
        assert_eq!(status, 401);

        let token = env.session_token(&user);
        let (status, json) = call(&env, "POST", "/api/auth/logout", None, Some(&token)).await;
        assert_eq!(status, 200);
        assert_eq!(json["message"], "Logged out successfully");

        let stored = env.gateways.user_reader.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.logout_count, 1);
        assert_eq!(stored.logout_history[0].origin.as_deref(), Some("203.0.113.9"));
    }

    #[rstest]
    #[tokio::test]
    async fn check_token_rejects_expired_token(env: TestEnv) {
        let user = env.seed_user("asha@example.com", "9876543210", "secret123").await;
        let token = env.session_token(&user);

        env.clock.advance(Duration::seconds(env.config.token.session_ttl_seconds + 1));
        let (status, _) = call(&env, "GET", "/api/auth/check-token", None, Some(&token)).await;

        assert_eq!(status, 401);
    }
}
