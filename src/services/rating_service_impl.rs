//! `SeaORM` implementation of the `RatingService` trait.

use async_trait::async_trait;

use crate::db::{Store, is_unique_violation};
use crate::domain::{MediaKind, RatingTarget};
use crate::models::rating::{NewRating, Rating, RatingSummary};
use crate::services::rating_service::{RatingError, RatingService};
use crate::validation::integrity::RATING_EXISTS;
use crate::validation::payload::{as_float, as_int, as_text, provided};
use crate::validation::{Payload, check_new_rating, validate_rating_data};

pub struct SeaOrmRatingService {
    store: Store,
}

impl SeaOrmRatingService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn new_rating(payload: &Payload) -> Result<NewRating, RatingError> {
    let target: RatingTarget = provided(payload, "target")
        .and_then(as_text)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            RatingError::Validation(vec!["Target must be one of: movie, episode".to_string()])
        })?;
    let target_id = provided(payload, "targetId")
        .and_then(as_int)
        .ok_or_else(|| {
            RatingError::Validation(vec!["Target ID must be a positive integer".to_string()])
        })?;
    let score = provided(payload, "score").and_then(as_float).ok_or_else(|| {
        RatingError::Validation(vec!["Score must be a number between 0 and 10".to_string()])
    })?;

    Ok(NewRating {
        target,
        target_id,
        score,
        review: provided(payload, "review")
            .and_then(as_text)
            .map(str::to_string),
    })
}

fn conflict_on_duplicate(err: anyhow::Error) -> RatingError {
    if is_unique_violation(&err) {
        RatingError::Conflict {
            code: "RATING_EXISTS",
            message: RATING_EXISTS.to_string(),
        }
    } else {
        RatingError::from(err)
    }
}

#[async_trait]
impl RatingService for SeaOrmRatingService {
    async fn create(&self, user_id: i32, payload: &Payload) -> Result<Rating, RatingError> {
        validate_rating_data(payload)
            .into_result()
            .map_err(RatingError::Validation)?;

        let new = new_rating(payload)?;
        check_new_rating(&self.store, user_id, new.target, new.target_id).await?;

        self.store
            .add_rating(user_id, new)
            .await
            .map_err(conflict_on_duplicate)
    }

    async fn movie_average(&self, movie_id: i32) -> Result<RatingSummary, RatingError> {
        if self
            .store
            .get_media_of_kind(movie_id, MediaKind::Film)
            .await?
            .is_none()
        {
            return Err(RatingError::NotFound {
                code: "MOVIE_NOT_FOUND",
                message: format!("Movie with ID '{movie_id}' not found"),
            });
        }

        let scores = self
            .store
            .rating_scores(RatingTarget::Movie, vec![movie_id])
            .await?;
        Ok(RatingSummary::from_scores(scores))
    }

    async fn series_average(&self, serie_id: i32) -> Result<RatingSummary, RatingError> {
        let episode_ids = self
            .store
            .list_serie_episodes(serie_id)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();

        let scores = self
            .store
            .rating_scores(RatingTarget::Episode, episode_ids)
            .await?;
        Ok(RatingSummary::from_scores(scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::media::NewMedia;

    async fn temp_store() -> Store {
        let db_path = std::env::temp_dir().join(format!(
            "mediatrack-rating-test-{}.db",
            uuid::Uuid::new_v4()
        ));
        let mut config = Config::default();
        config.general.database_path = format!("sqlite:{}", db_path.display());
        Store::from_config(&config).await.unwrap()
    }

    #[tokio::test]
    async fn duplicate_rating_insert_maps_to_conflict() {
        let store = temp_store().await;
        let film = store
            .add_media(NewMedia {
                kind: MediaKind::Film,
                title: "Heat".to_string(),
                genre: None,
                year: None,
                rating: None,
                platform: "Netflix".to_string(),
                duration: None,
                status: None,
            })
            .await
            .unwrap();

        let rating = NewRating {
            target: RatingTarget::Movie,
            target_id: film.id,
            score: 8.0,
            review: None,
        };
        store.add_rating(1, rating.clone()).await.unwrap();

        // Straight to the store, without the lookup that normally runs first.
        let err = store.add_rating(1, rating).await.unwrap_err();
        assert!(is_unique_violation(&err));
        assert!(matches!(
            conflict_on_duplicate(err),
            RatingError::Conflict { code: "RATING_EXISTS", .. }
        ));

        let other = conflict_on_duplicate(anyhow::anyhow!("disk full"));
        assert!(matches!(other, RatingError::Internal(_)));
    }
}
