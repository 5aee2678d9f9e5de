use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{self};
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use uuid::Uuid;

use crate::adapter::http::docs::{docs_ui, openapi_json};
use crate::adapter::http::middleware::auth::{admin_middleware, auth_middleware};
use crate::adapter::http::routes::admin::{
    active_users, admin_login, all_users, logged_in_users, top_active_users, user_by_id, users_by_date_range,
    users_by_location, users_overview,
};
use crate::adapter::http::routes::auth::{
    check_token, forgot_password, login, logout, reset_password, signup, verify_forgot, verify_login, verify_signup,
};
use crate::adapter::http::routes::user::get_profile;
use crate::infra::config::AppConfig;
use crate::infra::state::AppState;

fn build_cors(config: &AppConfig) -> CorsLayer {
    let has_wildcard = config.application.allow_origins.iter().any(|s| s == "*");

    if has_wildcard {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([http::Method::POST, http::Method::GET])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION]);
    }
    let origins: Vec<http::HeaderValue> = config
        .application
        .allow_origins
        .iter()
        .filter_map(|s| {
            s.parse::<http::HeaderValue>()
                .map_err(|e| {
                    tracing::warn!("Failed to parse origin '{}': {}", s, e);
                })
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([http::Method::POST, http::Method::GET])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}

pub fn auth_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/signup", post(signup))
        .route("/verify-signup-otp", post(verify_signup))
        .route("/login", post(login))
        .route("/verify-login-otp", post(verify_login))
        .route("/forgot-password", post(forgot_password))
        .route("/verify-forgot-otp", post(verify_forgot))
        .route("/reset-password", post(reset_password));

    let protected_routes = Router::new()
        .route("/logout", post(logout))
        .route("/check-token", get(check_token))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}

pub fn user_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

pub fn admin_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new().route("/login", post(admin_login));

    let protected_routes = Router::new()
        .route("/users", get(all_users))
        .route("/users/logged-in", get(logged_in_users))
        .route("/users/active", get(active_users))
        .route("/users/overview", get(users_overview))
        .route("/users/location", get(users_by_location))
        .route("/users/date-range", get(users_by_date_range))
        .route("/users/top-active", get(top_active_users))
        .route("/users/{user_id}", get(user_by_id))
        .route_layer(middleware::from_fn_with_state(state, admin_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}

pub fn router(state: AppState) -> Router<AppState> {
    let api = Router::new()
        .nest("/auth", auth_router(state.clone()))
        .nest("/user", user_router(state.clone()))
        .nest("/admin", admin_router(state));

    Router::new()
        .nest("/api", api)
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(docs_ui))
}

pub fn create_app(config: &AppConfig, state: AppState) -> Router {
    let cors = build_cors(config);
    Router::new()
        .merge(router(state.clone()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &http::Request<_>| {
                    let request_id = Uuid::now_v7();
                    tracing::info_span!(
                        "http-request",
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                        request_id = %request_id
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
