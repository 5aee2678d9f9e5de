use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{
    adapter::http::middleware::extractor::AuthUser,
    application::app_error::{AppError, AppResult},
    domain::entities::session::Role,
    infra::state::AppState,
};

/// Admits requests carrying a valid user session token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let token = extract_bearer_token(&request)?;
    let claims = state.token_codec.verify_session(&token)?;
    if claims.role != Role::User {
        return Err(AppError::Unauthorized);
    }
    request.extensions_mut().insert(AuthUser {
        user_id: claims.subject,
    });

    Ok(next.run(request).await)
}

/// Admits only admin tokens: 401 for a missing or bad token, 403 for a
/// valid token of another role.
pub async fn admin_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let token = extract_bearer_token(&request)?;
    let claims = state.token_codec.verify_session(&token)?;
    if claims.role != Role::Admin {
        tracing::warn!("Non-admin token used on admin route");
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> AppResult<String> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    match header.trim().strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AppError::Unauthorized),
    }
}
