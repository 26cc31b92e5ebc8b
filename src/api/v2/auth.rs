use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::api::validation::{JsonBody, parse_id};
use crate::api::{ApiError, ApiResponse, AppState, CorrelationId, CurrentUser};
use crate::models::user::User;

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: User,
    pub token: String,
}

impl AuthResponse {
    fn new(message: &'static str, user: User) -> Self {
        let token = user.api_key.clone();
        Self {
            message,
            user,
            token,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub user: User,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    JsonBody(payload): JsonBody,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let user = state.auth().register(&payload).await?;

    state
        .logs()
        .info(
            "user_registered",
            "User registered successfully",
            Some(json!({ "userId": user.id, "username": user.username })),
            Some(correlation.as_str()),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AuthResponse::new(
            "User registered successfully",
            user,
        ))),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let user = state.auth().login(&payload).await?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(ApiResponse::success(AuthResponse::new(
        "Login successful",
        user,
    ))))
}

pub async fn me(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::success(UserResponse {
        message: None,
        user,
    }))
}

pub async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    Extension(correlation): Extension<CorrelationId>,
    JsonBody(payload): JsonBody,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.auth().update_profile(current.id, &payload).await?;

    state
        .logs()
        .info(
            "profile_updated",
            "Profile updated successfully",
            Some(json!({ "userId": user.id })),
            Some(correlation.as_str()),
        )
        .await;

    Ok(Json(ApiResponse::success(UserResponse {
        message: Some("Profile updated successfully"),
        user,
    })))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let id = parse_id(&id)?;
    let user = state.auth().get_user(id).await?;
    Ok(Json(ApiResponse::success(UserResponse {
        message: None,
        user,
    })))
}

pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    Path(media_id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let media_id = parse_id(&media_id)?;
    let user = state.auth().add_favorite(current.id, media_id).await?;
    Ok(Json(ApiResponse::success(UserResponse {
        message: Some("Added to favorites"),
        user,
    })))
}

pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    Path(media_id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let media_id = parse_id(&media_id)?;
    let user = state.auth().remove_favorite(current.id, media_id).await?;
    Ok(Json(ApiResponse::success(UserResponse {
        message: Some("Removed from favorites"),
        user,
    })))
}
