use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::api::validation::{JsonBody, PageQuery, parse_id, parse_param};
use crate::api::{ApiError, ApiResponse, AppState, CorrelationId, Paginated};
use crate::domain::MediaKind;
use crate::models::episode::{Episode, Season};
use crate::models::media::{Media, MediaFilter};

#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationQuery {
    pub min_duration: Option<String>,
    pub max_duration: Option<String>,
}

pub async fn list_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeriesQuery>,
    Query(paging): Query<PageQuery>,
) -> Result<Json<ApiResponse<Paginated<Media>>>, ApiError> {
    let filter = MediaFilter {
        kind: Some(MediaKind::Serie),
        title: query.title.filter(|t| !t.trim().is_empty()),
        genre: query.genre.filter(|g| !g.trim().is_empty()),
        status: parse_param("status", query.status.as_deref())?,
        ..MediaFilter::default()
    };
    let (page, limit) = paging.resolve(&state.config().read().await.api);

    let (items, total) = state.catalog().page_media(&filter, page, limit).await?;
    Ok(Json(ApiResponse::success(Paginated::new(
        items, total, page, limit,
    ))))
}

pub async fn create_serie(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    JsonBody(payload): JsonBody,
) -> Result<(StatusCode, Json<ApiResponse<Media>>), ApiError> {
    let serie = state
        .catalog()
        .create_media(payload, Some(MediaKind::Serie))
        .await?;

    state
        .logs()
        .info(
            "series_created",
            &format!("Added series '{}'", serie.title),
            Some(json!({ "id": serie.id })),
            Some(correlation.as_str()),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(serie))))
}

pub async fn list_seasons(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(paging): Query<PageQuery>,
) -> Result<Json<ApiResponse<Paginated<Season>>>, ApiError> {
    let id = parse_id(&id)?;
    let (page, limit) = paging.resolve(&state.config().read().await.api);

    let seasons = state.catalog().list_seasons(id).await?;
    Ok(Json(ApiResponse::success(Paginated::from_vec(
        seasons, page, limit,
    ))))
}

pub async fn create_season(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody,
) -> Result<(StatusCode, Json<ApiResponse<Season>>), ApiError> {
    let id = parse_id(&id)?;
    let season = state.catalog().create_season(id, &payload).await?;

    state
        .logs()
        .info(
            "season_created",
            &format!("Added season {} to series {id}", season.season_number),
            Some(json!({ "id": season.id, "serieId": id })),
            Some(correlation.as_str()),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(season))))
}

pub async fn list_episodes(
    State(state): State<Arc<AppState>>,
    Path((id, season_id)): Path<(String, String)>,
    Query(durations): Query<DurationQuery>,
    Query(paging): Query<PageQuery>,
) -> Result<Json<ApiResponse<Paginated<Episode>>>, ApiError> {
    let id = parse_id(&id)?;
    let season_id = parse_id(&season_id)?;
    let min = parse_param("minDuration", durations.min_duration.as_deref())?;
    let max = parse_param("maxDuration", durations.max_duration.as_deref())?;
    let (page, limit) = paging.resolve(&state.config().read().await.api);

    let episodes = state
        .catalog()
        .list_episodes(id, season_id, min, max)
        .await?;
    Ok(Json(ApiResponse::success(Paginated::from_vec(
        episodes, page, limit,
    ))))
}

pub async fn create_episode(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Path((id, season_id)): Path<(String, String)>,
    JsonBody(payload): JsonBody,
) -> Result<(StatusCode, Json<ApiResponse<Episode>>), ApiError> {
    let id = parse_id(&id)?;
    let season_id = parse_id(&season_id)?;
    let episode = state
        .catalog()
        .create_episode(id, season_id, &payload)
        .await?;

    state
        .logs()
        .info(
            "episode_created",
            &format!("Added episode '{}'", episode.title),
            Some(json!({ "id": episode.id, "serieId": id, "seasonId": season_id })),
            Some(correlation.as_str()),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(episode))))
}

pub async fn get_episode(
    State(state): State<Arc<AppState>>,
    Path((id, season_id, episode_id)): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<Episode>>, ApiError> {
    let episode = state
        .catalog()
        .get_episode(
            parse_id(&id)?,
            parse_id(&season_id)?,
            parse_id(&episode_id)?,
        )
        .await?;
    Ok(Json(ApiResponse::success(episode)))
}

/// `{watched: bool}` on an episode of the given serie and season.
pub async fn set_watched(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Path((id, season_id, episode_id)): Path<(String, String, String)>,
    JsonBody(payload): JsonBody,
) -> Result<Json<ApiResponse<Episode>>, ApiError> {
    let (id, season_id, episode_id) = (
        parse_id(&id)?,
        parse_id(&season_id)?,
        parse_id(&episode_id)?,
    );
    let Some(&Value::Bool(watched)) = payload.get("watched") else {
        return Err(ApiError::Validation(vec![
            "watched field must be a boolean".to_string(),
        ]));
    };

    // Scope check: the episode must sit under this serie and season.
    state
        .catalog()
        .get_episode(id, season_id, episode_id)
        .await?;
    let episode = state.catalog().set_watched(episode_id, watched).await?;

    state
        .logs()
        .info(
            "episode_watched",
            &format!("Set watched={watched} on episode {episode_id}"),
            Some(json!({ "id": episode_id, "watched": watched })),
            Some(correlation.as_str()),
        )
        .await;

    Ok(Json(ApiResponse::success(episode)))
}
