use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::api::validation::{JsonBody, parse_id, parse_param};
use crate::api::{ApiError, ApiResponse, AppState, CorrelationId, MessageResponse};
use crate::domain::MediaKind;
use crate::models::media::{Media, MediaFilter};
use crate::validation::Payload;

#[derive(Debug, Default, Deserialize)]
pub struct MediaQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub status: Option<String>,
}

impl MediaQuery {
    fn to_filter(&self) -> Result<MediaFilter, ApiError> {
        Ok(MediaFilter {
            kind: parse_param("type", self.kind.as_deref())?,
            genre: self.genre.clone().filter(|g| !g.is_empty()),
            year: parse_param("year", self.year.as_deref())?,
            status: parse_param("status", self.status.as_deref())?,
            ..MediaFilter::default()
        })
    }
}

pub async fn list_media(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MediaQuery>,
) -> Result<Json<ApiResponse<Vec<Media>>>, ApiError> {
    let filter = query.to_filter()?;
    let media = state.catalog().list_media(&filter).await?;
    Ok(Json(ApiResponse::success(media)))
}

pub async fn get_media(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Media>>, ApiError> {
    let id = parse_id(&id)?;
    let media = state
        .catalog()
        .get_media(id, None)
        .await
        .map_err(|e| ApiError::from(e).reword_not_found("Media not found"))?;
    Ok(Json(ApiResponse::success(media)))
}

pub async fn create_media(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    JsonBody(payload): JsonBody,
) -> Result<(StatusCode, Json<ApiResponse<Media>>), ApiError> {
    insert(&state, &correlation, payload, None).await
}

pub async fn create_film(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    JsonBody(payload): JsonBody,
) -> Result<(StatusCode, Json<ApiResponse<Media>>), ApiError> {
    insert(&state, &correlation, payload, Some(MediaKind::Film)).await
}

pub async fn create_serie(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    JsonBody(payload): JsonBody,
) -> Result<(StatusCode, Json<ApiResponse<Media>>), ApiError> {
    insert(&state, &correlation, payload, Some(MediaKind::Serie)).await
}

async fn insert(
    state: &AppState,
    correlation: &CorrelationId,
    payload: Payload,
    kind: Option<MediaKind>,
) -> Result<(StatusCode, Json<ApiResponse<Media>>), ApiError> {
    let media = state.catalog().create_media(payload, kind).await?;

    state
        .logs()
        .info(
            "media_created",
            &format!("Added {} '{}'", media.kind, media.title),
            Some(json!({ "id": media.id, "type": media.kind })),
            Some(correlation.as_str()),
        )
        .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(media))))
}

pub async fn update_media(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody,
) -> Result<Json<ApiResponse<Media>>, ApiError> {
    let id = parse_id(&id)?;
    let media = state
        .catalog()
        .update_media(id, &payload, None)
        .await
        .map_err(|e| ApiError::from(e).reword_not_found("Media not found"))?;

    let fields: Vec<&String> = payload.keys().collect();
    state
        .logs()
        .info(
            "media_updated",
            &format!("Updated media {id}"),
            Some(json!({ "id": id, "fields": fields })),
            Some(correlation.as_str()),
        )
        .await;

    Ok(Json(ApiResponse::success(media)))
}

pub async fn delete_media(
    State(state): State<Arc<AppState>>,
    Extension(correlation): Extension<CorrelationId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = parse_id(&id)?;
    state
        .catalog()
        .delete_media(id, None)
        .await
        .map_err(|e| ApiError::from(e).reword_not_found("Media not found"))?;

    state
        .logs()
        .info(
            "media_deleted",
            &format!("Deleted media {id}"),
            Some(json!({ "id": id })),
            Some(correlation.as_str()),
        )
        .await;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Media deleted successfully",
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SerieStatus;

    #[test]
    fn test_query_to_filter() {
        let query = MediaQuery {
            kind: Some("Serie".into()),
            genre: Some(String::new()),
            year: Some("2008".into()),
            status: Some("On_hold".into()),
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.kind, Some(MediaKind::Serie));
        assert_eq!(filter.genre, None);
        assert_eq!(filter.year, Some(2008));
        assert_eq!(filter.status, Some(SerieStatus::OnHold));

        let query = MediaQuery {
            year: Some("recent".into()),
            ..MediaQuery::default()
        };
        assert!(query.to_filter().is_err());
    }
}
