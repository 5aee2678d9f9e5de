use axum::{Json, http::StatusCode, response::IntoResponse};

use crate::{
    adapter::http::{app_error_impl::ErrorResponse, middleware::extractor::AuthUser, schema::user::UserResponse},
    application::{app_error::AppResult, dto::id::IdDTO, interactors::users::GetProfileInteractor},
};

#[utoipa::path(
    get,
    path = "/api/user/profile",
    tag = "User",
    responses(
        (status = 200, description = "Current user without credentials", body = UserResponse),
        (
            status = 401,
            description = "Missing or invalid token",
            body = ErrorResponse,
            example = json!({ "error": "Not authorized" })
        ),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_profile(auth_user: AuthUser, interactor: GetProfileInteractor) -> AppResult<impl IntoResponse> {
    let dto = IdDTO {
        id: auth_user.user_id,
    };
    let user = interactor.execute(dto).await?;
    Ok((StatusCode::OK, Json(UserResponse::from(user))))
}
