use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::users::dtos::{
    LoginDto, LoginResponseDto, RegisterUserDto, UserCreatedDto, UserSummaryDto,
};
use crate::features::users::services::UserService;
use crate::shared::types::{ApiResponse, Meta};

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterUserDto,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<UserCreatedDto>),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Phone number already registered")
    ),
    tag = "users"
)]
pub async fn register_user(
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<RegisterUserDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserCreatedDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = service.register(dto).await?;
    let message = format!("User '{}' was added", created.name);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(created), Some(message), None)),
    ))
}

/// Log in with phone number and password
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponseDto>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "users"
)]
pub async fn login_user(
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<LoginDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.login(dto).await?;

    Ok(Json(ApiResponse::success(
        Some(response),
        Some("Login successful".to_string()),
        None,
    )))
}

/// List all users with credit scores, highest first
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users listed", body = ApiResponse<Vec<UserSummaryDto>>)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<Vec<UserSummaryDto>>>> {
    let users = service.list().await?;
    let total = users.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(users),
        None,
        Some(Meta { total }),
    )))
}
