use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::api::validation::{JsonBody, PageQuery, parse_id, parse_param};
use crate::api::{ApiError, ApiResponse, AppState, CorrelationId, MessageResponse, Paginated};
use crate::domain::MediaKind;
use crate::models::media::{Media, MediaFilter};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieQuery {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub min_year: Option<String>,
    pub max_year: Option<String>,
    pub min_duration: Option<String>,
    pub max_duration: Option<String>,
}

impl MovieQuery {
    fn to_filter(&self) -> Result<MediaFilter, ApiError> {
        Ok(MediaFilter {
            kind: Some(MediaKind::Film),
            title: self.title.clone().filter(|t| !t.trim().is_empty()),
            genre: self.genre.clone().filter(|g| !g.trim().is_empty()),
            min_year: parse_param("minYear", self.min_year.as_deref())?,
            max_year: parse_param("maxYear", self.max_year.as_deref())?,
            min_duration: parse_param("minDuration", self.min_duration.as_deref())?,
            max_duration: parse_param("maxDuration", self.max_duration.as_deref())?,
            ..MediaFilter::default()
        })
    }
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MovieQuery>,
    Query(paging): Query<PageQuery>,
) -> Result<Json<ApiResponse<Paginated<Media>>>, ApiError> {
    let filter = query.to_filter()?;
    let (page, limit) = paging.resolve(&state.config().read().await.api);

    let (items, total) = state.catalog().page_media(&filter, page, limit).await?;
    Ok(Json(ApiResponse::success(Paginated::new(
        items, total, page, limit,
    ))))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Media>>, ApiError> {
    let id = parse_id(&id)?;
    let movie = state.catalog().get_media(id, Some(MediaKind::Film)).await?;
    Ok(Json(ApiResponse::success(movie)))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    JsonBody(payload): JsonBody,
) -> Result<(StatusCode, Json<ApiResponse<Media>>), ApiError> {
    let movie = state
        .catalog()
        .create_media(payload, Some(MediaKind::Film))
        .await?;

    state
        .logs()
        .info(
            "movie_created",
            &format!("Added movie '{}'", movie.title),
            Some(json!({ "id": movie.id })),
            Some(correlation.as_str()),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(movie))))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody,
) -> Result<Json<ApiResponse<Media>>, ApiError> {
    let id = parse_id(&id)?;
    let movie = state
        .catalog()
        .update_media(id, &payload, Some(MediaKind::Film))
        .await?;

    state
        .logs()
        .info(
            "movie_updated",
            &format!("Updated movie {id}"),
            Some(json!({ "id": id })),
            Some(correlation.as_str()),
        )
        .await;

    Ok(Json(ApiResponse::success(movie)))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = parse_id(&id)?;
    state
        .catalog()
        .delete_media(id, Some(MediaKind::Film))
        .await?;

    state
        .logs()
        .info(
            "movie_deleted",
            &format!("Deleted movie {id}"),
            Some(json!({ "id": id })),
            Some(correlation.as_str()),
        )
        .await;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Movie deleted successfully",
    ))))
}
