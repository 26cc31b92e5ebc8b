use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use crate::api::validation::parse_id;
use crate::api::{ApiError, ApiResponse, AppState, LogDto};
use crate::models::media::Media;

/// A user's favorite media. A missing user and an empty list look the same.
pub async fn favorites(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Media>>>, ApiError> {
    let id = parse_id(&id)?;
    let media = state
        .auth()
        .favorite_media(id)
        .await
        .map_err(|e| ApiError::from(e).reword_not_found("No favorites found"))?;

    if media.is_empty() {
        return Err(ApiError::not_found("FAVORITES_NOT_FOUND", "No favorites found"));
    }

    Ok(Json(ApiResponse::success(media)))
}

/// The most recent recorded operation.
pub async fn last_log(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<LogDto>>, ApiError> {
    let entry = state
        .logs()
        .latest()
        .await?
        .ok_or_else(|| ApiError::not_found("LOG_NOT_FOUND", "No logs found"))?;

    Ok(Json(ApiResponse::success(entry.into())))
}
