use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::api::validation::{JsonBody, parse_id};
use crate::api::{ApiError, ApiResponse, AppState, CorrelationId};
use crate::models::episode::{Episode, Season, SeasonWithEpisodes};
use crate::validation::payload::{as_int, present};

pub async fn serie_episodes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<SeasonWithEpisodes>>>, ApiError> {
    let id = parse_id(&id)?;
    let seasons = state
        .catalog()
        .serie_episodes(id)
        .await
        .map_err(|e| ApiError::from(e).reword_not_found("Series not found"))?;
    Ok(Json(ApiResponse::success(seasons)))
}

/// `{serieId, seasonNumber, releaseDate}`
pub async fn create_season(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    JsonBody(payload): JsonBody,
) -> Result<(StatusCode, Json<ApiResponse<Season>>), ApiError> {
    let (Some(serie_id), Some(_), Some(_)) = (
        present(&payload, "serieId"),
        present(&payload, "seasonNumber"),
        present(&payload, "releaseDate"),
    ) else {
        return Err(ApiError::bad_request(
            "serieId, seasonNumber, and releaseDate are required",
        ));
    };

    // Store ids start at 1, so an unreadable id resolves to no serie.
    let serie_id = as_int(serie_id).unwrap_or(0);
    let season = state
        .catalog()
        .create_season(serie_id, &payload)
        .await
        .map_err(|e| ApiError::from(e).reword_not_found("Series not found"))?;

    state
        .logs()
        .info(
            "season_created",
            &format!("Added season {} to serie {serie_id}", season.season_number),
            Some(json!({ "id": season.id, "serieId": serie_id })),
            Some(correlation.as_str()),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(season))))
}

/// `{serieId, seasonNumber, title, episodeNumber, duration}`
pub async fn create_episode(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    JsonBody(payload): JsonBody,
) -> Result<(StatusCode, Json<ApiResponse<Episode>>), ApiError> {
    let required = ["serieId", "seasonNumber", "title", "episodeNumber", "duration"];
    if required.iter().any(|key| present(&payload, key).is_none()) {
        return Err(ApiError::bad_request(
            "serieId, seasonNumber, title, episodeNumber, and duration are required",
        ));
    }

    let serie_id = present(&payload, "serieId").and_then(as_int).unwrap_or(0);
    let season_number = present(&payload, "seasonNumber")
        .and_then(as_int)
        .unwrap_or(0);

    let episode = state
        .catalog()
        .create_episode_by_season_number(serie_id, season_number, &payload)
        .await
        .map_err(|e| ApiError::from(e).reword_not_found("Series or season not found"))?;

    state
        .logs()
        .info(
            "episode_created",
            &format!("Added episode '{}'", episode.title),
            Some(json!({
                "id": episode.id,
                "serieId": serie_id,
                "seasonId": episode.season_id,
            })),
            Some(correlation.as_str()),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(episode))))
}

/// `{watched: bool}`
pub async fn set_watched(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody,
) -> Result<Json<ApiResponse<Episode>>, ApiError> {
    let id = parse_id(&id)?;
    let Some(&Value::Bool(watched)) = payload.get("watched") else {
        return Err(ApiError::bad_request("watched field must be a boolean"));
    };

    let episode = state
        .catalog()
        .set_watched(id, watched)
        .await
        .map_err(|e| ApiError::from(e).reword_not_found("Episode not found"))?;

    state
        .logs()
        .info(
            "episode_watched",
            &format!("Marked episode {id} as {}", if watched { "watched" } else { "unwatched" }),
            Some(json!({ "id": id, "watched": watched })),
            Some(correlation.as_str()),
        )
        .await;

    Ok(Json(ApiResponse::success(episode)))
}
