use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::adapter::http::app_error_impl::ErrorResponse;
use crate::adapter::http::schema::admin::{
    DateRangeQuery, LocationQuery, OverviewListResponse, SingleUserResponse, UserListResponse, UserOverviewResponse,
};
use crate::adapter::http::schema::auth::{AdminLoginRequest, TokenResponse};
use crate::adapter::http::schema::user::UserResponse;
use crate::adapter::http::validation::{ValidJson, ValidQuery};
use crate::application::app_error::AppResult;
use crate::application::dto::admin::UserQueryDTO;
use crate::application::dto::auth::AdminLoginDTO;
use crate::application::dto::id::IdDTO;
use crate::application::interactors::admin::{GetUserByIdInteractor, GetUserOverviewInteractor, ListUsersInteractor};
use crate::application::interactors::auth::AdminLoginInteractor;
use crate::infra::config::AppConfig;

const TOP_ACTIVE_LIMIT: usize = 10;

async fn list(interactor: &ListUsersInteractor, query: UserQueryDTO) -> AppResult<Json<UserListResponse>> {
    let users = interactor.execute(query).await?;
    let users = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(UserListResponse::new(users)))
}

#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "Admin",
    request_body(content = AdminLoginRequest, example = json!({ "secret": "change-me" })),
    responses(
        (status = 200, description = "Admin token issued", body = TokenResponse),
        (
            status = 401,
            description = "Wrong secret",
            body = ErrorResponse,
            example = json!({ "error": "Invalid admin secret" })
        )
    )
)]
pub async fn admin_login(
    interactor: AdminLoginInteractor,
    State(config): State<Arc<AppConfig>>,
    ValidJson(payload): ValidJson<AdminLoginRequest>,
) -> AppResult<impl IntoResponse> {
    let dto = AdminLoginDTO {
        secret: payload.secret,
        ttl: config.token.admin_ttl_seconds,
    };
    let token = interactor.execute(dto)?;
    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            message: "Admin login successful".to_string(),
            token: token.token,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    responses(
        (status = 200, description = "All users, oldest registration first", body = UserListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an admin token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn all_users(interactor: ListUsersInteractor) -> AppResult<impl IntoResponse> {
    list(&interactor, UserQueryDTO::All).await
}

#[utoipa::path(
    get,
    path = "/api/admin/users/logged-in",
    tag = "Admin",
    responses(
        (status = 200, description = "Users that logged in at least once", body = UserListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an admin token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn logged_in_users(interactor: ListUsersInteractor) -> AppResult<impl IntoResponse> {
    list(&interactor, UserQueryDTO::LoggedIn).await
}

#[utoipa::path(
    get,
    path = "/api/admin/users/active",
    tag = "Admin",
    responses(
        (status = 200, description = "Users whose last login is newer than their last logout", body = UserListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an admin token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn active_users(interactor: ListUsersInteractor) -> AppResult<impl IntoResponse> {
    list(&interactor, UserQueryDTO::Active).await
}

#[utoipa::path(
    get,
    path = "/api/admin/users/overview",
    tag = "Admin",
    responses(
        (status = 200, description = "Per-user activity summary", body = OverviewListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an admin token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn users_overview(interactor: GetUserOverviewInteractor) -> AppResult<impl IntoResponse> {
    let users: Vec<UserOverviewResponse> = interactor
        .execute()
        .await?
        .into_iter()
        .map(UserOverviewResponse::from)
        .collect();
    Ok(Json(OverviewListResponse {
        count: users.len(),
        users,
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/location",
    tag = "Admin",
    params(LocationQuery),
    responses(
        (status = 200, description = "Users matching every given locality field", body = UserListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an admin token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn users_by_location(
    interactor: ListUsersInteractor,
    ValidQuery(query): ValidQuery<LocationQuery>,
) -> AppResult<impl IntoResponse> {
    let query = UserQueryDTO::Location {
        district: query.district,
        taluka: query.taluka,
        police_station: query.police_station,
    };
    list(&interactor, query).await
}

#[utoipa::path(
    get,
    path = "/api/admin/users/date-range",
    tag = "Admin",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Users registered within the range, inclusive", body = UserListResponse),
        (
            status = 400,
            description = "Missing or malformed dates",
            body = ErrorResponse,
            example = json!({ "error": "Validation error: Start and end dates are required" })
        ),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an admin token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn users_by_date_range(
    interactor: ListUsersInteractor,
    ValidQuery(query): ValidQuery<DateRangeQuery>,
) -> AppResult<impl IntoResponse> {
    let (from, to) = query.bounds()?;
    list(&interactor, UserQueryDTO::RegisteredBetween { from, to }).await
}

#[utoipa::path(
    get,
    path = "/api/admin/users/top-active",
    tag = "Admin",
    responses(
        (status = 200, description = "Ten users with the most logins", body = UserListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an admin token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn top_active_users(interactor: ListUsersInteractor) -> AppResult<impl IntoResponse> {
    list(&interactor, UserQueryDTO::TopActive { limit: TOP_ACTIVE_LIMIT }).await
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{user_id}",
    tag = "Admin",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User details", body = SingleUserResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn user_by_id(
    interactor: GetUserByIdInteractor,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user = interactor.execute(IdDTO { id: user_id }).await?;
    Ok(Json(SingleUserResponse { user: user.into() }))
}
