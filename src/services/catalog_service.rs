//! Domain service for the media catalog: films, series, seasons and episodes.
//!
//! Every write runs the matching entity validator first, then the integrity
//! rules, then the insert. The unique indexes behind the store have the last
//! word on duplicates.

use thiserror::Error;

use crate::domain::MediaKind;
use crate::models::episode::{Episode, Season, SeasonWithEpisodes};
use crate::models::media::{Media, MediaFilter};
use crate::validation::{IntegrityError, Payload};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    #[error("{message}")]
    Conflict { code: &'static str, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub(crate) fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
        }
    }

    /// Not-found error for a media id, worded after the kind the caller asked for.
    pub(crate) fn media_not_found(id: i32, kind: Option<MediaKind>) -> Self {
        match kind {
            Some(MediaKind::Film) => {
                Self::not_found("MOVIE_NOT_FOUND", format!("Movie with ID '{id}' not found"))
            }
            Some(MediaKind::Serie) => {
                Self::not_found("SERIES_NOT_FOUND", format!("Series with ID '{id}' not found"))
            }
            None => Self::not_found("MEDIA_NOT_FOUND", format!("Media with ID '{id}' not found")),
        }
    }
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<IntegrityError> for CatalogError {
    fn from(err: IntegrityError) -> Self {
        match err {
            IntegrityError::NotFound { code, message } => Self::NotFound { code, message },
            IntegrityError::Conflict { code, message } => Self::Conflict { code, message },
            IntegrityError::Lookup(e) => Self::Internal(e.to_string()),
        }
    }
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_media(&self, filter: &MediaFilter) -> Result<Vec<Media>, CatalogError>;

    /// One page of matches, newest first, plus the total match count.
    async fn page_media(
        &self,
        filter: &MediaFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<Media>, u64), CatalogError>;

    /// Looks up a media record. With `kind` set, a record of the other kind
    /// counts as missing.
    async fn get_media(&self, id: i32, kind: Option<MediaKind>) -> Result<Media, CatalogError>;

    /// Validates and stores a new record. `kind`, when given, overrides any
    /// `type` in the payload.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] with every violated rule.
    async fn create_media(
        &self,
        payload: Payload,
        kind: Option<MediaKind>,
    ) -> Result<Media, CatalogError>;

    /// Re-validates each supplied field on its own and applies them. The
    /// first failing field aborts the update.
    async fn update_media(
        &self,
        id: i32,
        payload: &Payload,
        kind: Option<MediaKind>,
    ) -> Result<Media, CatalogError>;

    /// Removes a record with its seasons, episodes, ratings and favorites.
    async fn delete_media(&self, id: i32, kind: Option<MediaKind>) -> Result<(), CatalogError>;

    async fn list_seasons(&self, serie_id: i32) -> Result<Vec<Season>, CatalogError>;

    /// Every season of a serie with its episodes nested.
    async fn serie_episodes(&self, serie_id: i32)
    -> Result<Vec<SeasonWithEpisodes>, CatalogError>;

    /// # Errors
    ///
    /// Validation first, then [`CatalogError::NotFound`] for a missing serie
    /// and [`CatalogError::Conflict`] for a taken season number.
    async fn create_season(&self, serie_id: i32, payload: &Payload)
    -> Result<Season, CatalogError>;

    async fn create_episode(
        &self,
        serie_id: i32,
        season_id: i32,
        payload: &Payload,
    ) -> Result<Episode, CatalogError>;

    /// Same as [`CatalogService::create_episode`], locating the season by its
    /// number within the serie.
    async fn create_episode_by_season_number(
        &self,
        serie_id: i32,
        season_number: i32,
        payload: &Payload,
    ) -> Result<Episode, CatalogError>;

    async fn list_episodes(
        &self,
        serie_id: i32,
        season_id: i32,
        min_duration: Option<i32>,
        max_duration: Option<i32>,
    ) -> Result<Vec<Episode>, CatalogError>;

    async fn get_episode(
        &self,
        serie_id: i32,
        season_id: i32,
        episode_id: i32,
    ) -> Result<Episode, CatalogError>;

    async fn set_watched(&self, episode_id: i32, watched: bool) -> Result<Episode, CatalogError>;
}
