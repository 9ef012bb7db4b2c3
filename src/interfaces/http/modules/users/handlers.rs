//! User management API handlers
//!
//! Admin CRUD endpoints. Delegates to `UserAccountService` from the
//! application/identity layer.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateUserRequest, RoleDto, UpdateUserRequest, UserDto};
use crate::application::UserAccountService;
use crate::domain::User;
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, ValidatedJson};

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserAccountService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users in id order", body = ApiResponse<Vec<UserDto>>)
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
) -> ApiResult<Json<ApiResponse<Vec<UserDto>>>> {
    let users = state.user_service.find_all().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let user = state.user_service.find_by_id(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/by-name/{name}",
    tag = "Users",
    params(("name" = String, Path, description = "User name")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user_by_name(
    State(state): State<UserHandlerState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    match state
        .user_service
        .get_user_by_name(&name)
        .await
        .map_err(domain_error)?
    {
        Some(user) => Ok(Json(ApiResponse::success(UserDto::from(user)))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("User '{}' not found", name))),
        )),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 400, description = "Unknown role or malformed body"),
        (status = 409, description = "Name already taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserDto>>)> {
    let user = User::new(request.name, request.email, request.password);
    let saved = state
        .user_service
        .save_user(user, &request.roles)
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(saved))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Roles updated; name, email and password are kept", body = ApiResponse<UserDto>),
        (status = 400, description = "Unknown role"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(mut request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let service = &state.user_service;
    let old_user = service.find_by_id(id).await.map_err(domain_error)?;

    let roles = std::mem::take(&mut request.roles);
    service
        .update_user(&old_user, request.into_user(id), &roles)
        .await
        .map_err(domain_error)?;

    let updated = service.find_by_id(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(UserDto::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted (or did not exist)")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state
        .user_service
        .delete_by_id(id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    get,
    path = "/api/v1/roles",
    tag = "Roles",
    responses(
        (status = 200, description = "Selectable roles", body = ApiResponse<Vec<RoleDto>>)
    )
)]
pub async fn list_roles(
    State(state): State<UserHandlerState>,
) -> ApiResult<Json<ApiResponse<Vec<RoleDto>>>> {
    let roles = state.user_service.list_roles().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        roles.into_iter().map(RoleDto::from).collect(),
    )))
}
