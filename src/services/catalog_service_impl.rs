//! `SeaORM` implementation of the `CatalogService` trait.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::db::{Store, is_unique_violation};
use crate::domain::{MediaKind, SerieStatus};
use crate::models::episode::{Episode, NewEpisode, Season, SeasonWithEpisodes};
use crate::models::media::{Media, MediaFilter, MediaUpdate, NewMedia};
use crate::services::catalog_service::{CatalogError, CatalogService};
use crate::validation::fields::parse_release_date;
use crate::validation::integrity::{EPISODE_EXISTS, SEASON_EXISTS};
use crate::validation::payload::{as_float, as_int, as_text, provided};
use crate::validation::{
    Payload, check_new_episode, check_new_season, validate_episode_data, validate_field,
    validate_media_data, validate_season_data,
};

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn require_serie(&self, serie_id: i32) -> Result<Media, CatalogError> {
        self.store
            .get_media_of_kind(serie_id, MediaKind::Serie)
            .await?
            .ok_or_else(|| CatalogError::media_not_found(serie_id, Some(MediaKind::Serie)))
    }

    async fn require_season(&self, serie_id: i32, season_id: i32) -> Result<Season, CatalogError> {
        self.store
            .get_season(serie_id, season_id)
            .await?
            .ok_or_else(|| {
                CatalogError::not_found(
                    "SEASON_NOT_FOUND",
                    format!("Season with ID '{season_id}' not found"),
                )
            })
    }

    async fn find_media(&self, id: i32, kind: Option<MediaKind>) -> Result<Option<Media>, CatalogError> {
        let media = match kind {
            Some(kind) => self.store.get_media_of_kind(id, kind).await?,
            None => self.store.get_media(id).await?,
        };
        Ok(media)
    }
}

/// Reads an integer field that already passed its positive-integer rule.
/// Values too large for the column are reported with the rule's own message.
fn int_field(value: Option<&Value>, message: &str) -> Result<Option<i32>, CatalogError> {
    match value {
        None => Ok(None),
        Some(value) => as_int(value)
            .map(Some)
            .ok_or_else(|| CatalogError::Validation(vec![message.to_string()])),
    }
}

fn text_field(value: Option<&Value>) -> Option<String> {
    value.and_then(as_text).map(str::to_string)
}

fn status_field(value: Option<&Value>) -> Option<SerieStatus> {
    value.and_then(as_text).and_then(|s| s.parse().ok())
}

fn new_media(payload: &Payload) -> Result<NewMedia, CatalogError> {
    let kind: MediaKind = provided(payload, "type")
        .and_then(as_text)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| CatalogError::Validation(vec!["Invalid type".to_string()]))?;

    let duration = match kind {
        MediaKind::Film => int_field(
            provided(payload, "duration"),
            "Duration must be a positive number",
        )?,
        MediaKind::Serie => None,
    };
    let status = match kind {
        MediaKind::Film => None,
        MediaKind::Serie => status_field(provided(payload, "status")),
    };

    Ok(NewMedia {
        kind,
        title: text_field(provided(payload, "title")).unwrap_or_default(),
        genre: text_field(provided(payload, "genre")),
        year: int_field(provided(payload, "year"), "Year must be a positive number")?,
        rating: provided(payload, "rating").and_then(as_float),
        platform: text_field(provided(payload, "platform")).unwrap_or_default(),
        duration,
        status,
    })
}

/// Turns a payload of individually validated fields into an update.
fn media_update(payload: &Payload) -> Result<MediaUpdate, CatalogError> {
    let mut update = MediaUpdate::default();

    for (name, value) in payload {
        let check = validate_field(name, value);
        if !check.is_valid {
            let error = check.error.unwrap_or_else(|| format!("Invalid {name}"));
            return Err(CatalogError::Validation(vec![error]));
        }

        let invalid = format!("Invalid {name}");
        match name.as_str() {
            "title" => update.title = text_field(Some(value)),
            "platform" => update.platform = text_field(Some(value)),
            "genre" => update.genre = text_field(Some(value)),
            "status" => update.status = status_field(Some(value)),
            "rating" => update.rating = as_float(value),
            "duration" => update.duration = int_field(Some(value), &invalid)?,
            "year" => update.year = int_field(Some(value), &invalid)?,
            _ => {}
        }
    }

    Ok(update)
}

fn conflict_on_duplicate(err: anyhow::Error, code: &'static str, message: &str) -> CatalogError {
    if is_unique_violation(&err) {
        CatalogError::Conflict {
            code,
            message: message.to_string(),
        }
    } else {
        CatalogError::from(err)
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list_media(&self, filter: &MediaFilter) -> Result<Vec<Media>, CatalogError> {
        Ok(self.store.list_media(filter).await?)
    }

    async fn page_media(
        &self,
        filter: &MediaFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<Media>, u64), CatalogError> {
        Ok(self.store.page_media(filter, page, limit).await?)
    }

    async fn get_media(&self, id: i32, kind: Option<MediaKind>) -> Result<Media, CatalogError> {
        self.find_media(id, kind)
            .await?
            .ok_or_else(|| CatalogError::media_not_found(id, kind))
    }

    async fn create_media(
        &self,
        mut payload: Payload,
        kind: Option<MediaKind>,
    ) -> Result<Media, CatalogError> {
        if let Some(kind) = kind {
            payload.insert("type".to_string(), Value::from(kind.as_str()));
        }

        validate_media_data(&payload)
            .into_result()
            .map_err(CatalogError::Validation)?;

        let media = self.store.add_media(new_media(&payload)?).await?;
        Ok(media)
    }

    async fn update_media(
        &self,
        id: i32,
        payload: &Payload,
        kind: Option<MediaKind>,
    ) -> Result<Media, CatalogError> {
        let update = media_update(payload)?;

        if update.is_empty() {
            return self.get_media(id, kind).await;
        }

        if self.find_media(id, kind).await?.is_none() {
            return Err(CatalogError::media_not_found(id, kind));
        }

        self.store
            .update_media(id, update)
            .await?
            .ok_or_else(|| CatalogError::media_not_found(id, kind))
    }

    async fn delete_media(&self, id: i32, kind: Option<MediaKind>) -> Result<(), CatalogError> {
        if self.find_media(id, kind).await?.is_none() {
            return Err(CatalogError::media_not_found(id, kind));
        }

        if !self.store.remove_media(id).await? {
            return Err(CatalogError::media_not_found(id, kind));
        }
        Ok(())
    }

    async fn list_seasons(&self, serie_id: i32) -> Result<Vec<Season>, CatalogError> {
        self.require_serie(serie_id).await?;
        Ok(self.store.list_seasons(serie_id).await?)
    }

    async fn serie_episodes(
        &self,
        serie_id: i32,
    ) -> Result<Vec<SeasonWithEpisodes>, CatalogError> {
        self.require_serie(serie_id).await?;

        let seasons = self.store.list_seasons(serie_id).await?;
        let mut episodes = self.store.list_serie_episodes(serie_id).await?;

        let grouped = seasons
            .into_iter()
            .map(|season| {
                let (own, rest): (Vec<Episode>, Vec<Episode>) =
                    episodes.drain(..).partition(|e| e.season_id == season.id);
                episodes = rest;
                SeasonWithEpisodes {
                    season,
                    episodes: own,
                }
            })
            .collect();

        Ok(grouped)
    }

    async fn create_season(
        &self,
        serie_id: i32,
        payload: &Payload,
    ) -> Result<Season, CatalogError> {
        validate_season_data(payload)
            .into_result()
            .map_err(CatalogError::Validation)?;

        let season_number = int_field(
            provided(payload, "seasonNumber"),
            "Season number must be a positive integer",
        )?
        .unwrap_or_default();
        let release_date = provided(payload, "releaseDate")
            .and_then(parse_release_date)
            .ok_or_else(|| {
                CatalogError::Validation(vec!["Release date must be a valid date".to_string()])
            })?;

        check_new_season(&self.store, serie_id, season_number).await?;

        let season = self
            .store
            .add_season(serie_id, season_number, release_date)
            .await
            .map_err(|e| conflict_on_duplicate(e, "SEASON_EXISTS", SEASON_EXISTS))?;

        info!(serie_id, season_id = season.id, "Season created");
        Ok(season)
    }

    async fn create_episode(
        &self,
        serie_id: i32,
        season_id: i32,
        payload: &Payload,
    ) -> Result<Episode, CatalogError> {
        validate_episode_data(payload)
            .into_result()
            .map_err(CatalogError::Validation)?;

        let episode_number = int_field(
            provided(payload, "episodeNumber"),
            "Episode number must be a positive integer",
        )?
        .unwrap_or_default();
        let duration = int_field(
            provided(payload, "duration"),
            "Duration must be a positive integer",
        )?
        .unwrap_or_default();

        check_new_episode(&self.store, serie_id, season_id, episode_number).await?;

        let episode = self
            .store
            .add_episode(NewEpisode {
                serie_id,
                season_id,
                title: text_field(provided(payload, "title")).unwrap_or_default(),
                episode_number,
                duration,
            })
            .await
            .map_err(|e| conflict_on_duplicate(e, "EPISODE_EXISTS", EPISODE_EXISTS))?;

        Ok(episode)
    }

    async fn create_episode_by_season_number(
        &self,
        serie_id: i32,
        season_number: i32,
        payload: &Payload,
    ) -> Result<Episode, CatalogError> {
        validate_episode_data(payload)
            .into_result()
            .map_err(CatalogError::Validation)?;

        let season = match self.find_media(serie_id, Some(MediaKind::Serie)).await? {
            Some(_) => self.store.find_season_by_number(serie_id, season_number).await?,
            None => None,
        };
        let Some(season) = season else {
            return Err(CatalogError::not_found(
                "SEASON_NOT_FOUND",
                "Series or season not found",
            ));
        };

        self.create_episode(serie_id, season.id, payload).await
    }

    async fn list_episodes(
        &self,
        serie_id: i32,
        season_id: i32,
        min_duration: Option<i32>,
        max_duration: Option<i32>,
    ) -> Result<Vec<Episode>, CatalogError> {
        self.require_serie(serie_id).await?;
        self.require_season(serie_id, season_id).await?;

        Ok(self
            .store
            .list_episodes(season_id, min_duration, max_duration)
            .await?)
    }

    async fn get_episode(
        &self,
        serie_id: i32,
        season_id: i32,
        episode_id: i32,
    ) -> Result<Episode, CatalogError> {
        self.store
            .get_episode(episode_id)
            .await?
            .filter(|e| e.serie_id == serie_id && e.season_id == season_id)
            .ok_or_else(|| {
                CatalogError::not_found(
                    "EPISODE_NOT_FOUND",
                    format!("Episode with ID '{episode_id}' not found"),
                )
            })
    }

    async fn set_watched(&self, episode_id: i32, watched: bool) -> Result<Episode, CatalogError> {
        self.store
            .set_episode_watched(episode_id, watched)
            .await?
            .ok_or_else(|| {
                CatalogError::not_found(
                    "EPISODE_NOT_FOUND",
                    format!("Episode with ID '{episode_id}' not found"),
                )
            })
    }
}
