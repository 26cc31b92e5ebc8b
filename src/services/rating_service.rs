//! Domain service for user ratings on films and episodes.

use thiserror::Error;

use crate::models::rating::{Rating, RatingSummary};
use crate::validation::{IntegrityError, Payload};

#[derive(Debug, Error)]
pub enum RatingError {
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

impl From<sea_orm::DbErr> for RatingError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RatingError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<IntegrityError> for RatingError {
    fn from(err: IntegrityError) -> Self {
        match err {
            IntegrityError::NotFound { code, message } => Self::NotFound { code, message },
            IntegrityError::Conflict { code, message } => Self::Conflict { code, message },
            IntegrityError::Lookup(e) => Self::Internal(e.to_string()),
        }
    }
}

#[async_trait::async_trait]
pub trait RatingService: Send + Sync {
    /// Records `user_id`'s rating of a film or an episode.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::Validation`] for a malformed payload,
    /// [`RatingError::NotFound`] when the target does not exist and
    /// [`RatingError::Conflict`] when the user already rated it.
    async fn create(&self, user_id: i32, payload: &Payload) -> Result<Rating, RatingError>;

    /// Average over every rating of one film.
    async fn movie_average(&self, movie_id: i32) -> Result<RatingSummary, RatingError>;

    /// Average over the ratings of every episode of a serie.
    async fn series_average(&self, serie_id: i32) -> Result<RatingSummary, RatingError>;
}
