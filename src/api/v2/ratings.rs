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
use crate::models::rating::{Rating, RatingSummary};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieAverage {
    pub movie_id: i32,
    #[serde(flatten)]
    pub summary: RatingSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesAverage {
    pub series_id: i32,
    #[serde(flatten)]
    pub summary: RatingSummary,
}

pub async fn create_rating(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(correlation): Extension<CorrelationId>,
    JsonBody(payload): JsonBody,
) -> Result<(StatusCode, Json<ApiResponse<Rating>>), ApiError> {
    let rating = state.ratings().create(user.id, &payload).await?;

    state
        .logs()
        .info(
            "rating_created",
            &format!("User {} rated {} {}", user.id, rating.target, rating.target_id),
            Some(json!({
                "id": rating.id,
                "target": rating.target,
                "targetId": rating.target_id,
                "score": rating.score,
            })),
            Some(correlation.as_str()),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(rating))))
}

pub async fn movie_average(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MovieAverage>>, ApiError> {
    let movie_id = parse_id(&id)?;
    let summary = state.ratings().movie_average(movie_id).await?;
    Ok(Json(ApiResponse::success(MovieAverage { movie_id, summary })))
}

pub async fn series_average(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SeriesAverage>>, ApiError> {
    let series_id = parse_id(&id)?;
    let summary = state.ratings().series_average(series_id).await?;
    Ok(Json(ApiResponse::success(SeriesAverage { series_id, summary })))
}
