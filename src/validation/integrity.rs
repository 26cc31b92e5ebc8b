//! Cross-entity rules that need to look at stored data.
//!
//! These run after a payload passed its entity validator and before anything
//! is written. A missing parent is reported as [`IntegrityError::NotFound`],
//! a duplicate as [`IntegrityError::Conflict`]; neither is ever folded into a
//! validation failure.
//!
//! The checks are advisory. Two concurrent requests can both pass them, so
//! the store backs each one with a unique index.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::RatingTarget;

#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    #[error("{message}")]
    Conflict { code: &'static str, message: String },

    #[error("Lookup failed: {0}")]
    Lookup(#[from] anyhow::Error),
}

pub const SEASON_EXISTS: &str = "Season already exists";
pub const EPISODE_EXISTS: &str = "Episode already exists";
pub const RATING_EXISTS: &str = "You have already rated this item";

impl IntegrityError {
    fn not_found(code: &'static str, message: String) -> Self {
        Self::NotFound { code, message }
    }

    fn conflict(code: &'static str, message: &str) -> Self {
        Self::Conflict {
            code,
            message: message.to_string(),
        }
    }
}

/// Existence queries the integrity rules need from persistence.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// True when `serie_id` names a media record of kind Serie.
    async fn serie_exists(&self, serie_id: i32) -> anyhow::Result<bool>;

    /// True when `season_id` exists and belongs to `serie_id`.
    async fn season_in_serie(&self, serie_id: i32, season_id: i32) -> anyhow::Result<bool>;

    async fn season_number_taken(
        &self,
        serie_id: i32,
        season_number: i32,
    ) -> anyhow::Result<bool>;

    async fn episode_number_taken(
        &self,
        season_id: i32,
        episode_number: i32,
    ) -> anyhow::Result<bool>;

    /// True when a film (for `Movie`) or an episode (for `Episode`) has this id.
    async fn target_exists(&self, target: RatingTarget, target_id: i32) -> anyhow::Result<bool>;

    async fn rating_exists(
        &self,
        user_id: i32,
        target: RatingTarget,
        target_id: i32,
    ) -> anyhow::Result<bool>;
}

pub async fn check_new_season<L>(
    lookup: &L,
    serie_id: i32,
    season_number: i32,
) -> Result<(), IntegrityError>
where
    L: CatalogLookup + ?Sized,
{
    if !lookup.serie_exists(serie_id).await? {
        return Err(IntegrityError::not_found(
            "SERIES_NOT_FOUND",
            format!("Series with ID '{serie_id}' not found"),
        ));
    }

    if lookup.season_number_taken(serie_id, season_number).await? {
        return Err(IntegrityError::conflict("SEASON_EXISTS", SEASON_EXISTS));
    }

    Ok(())
}

pub async fn check_new_episode<L>(
    lookup: &L,
    serie_id: i32,
    season_id: i32,
    episode_number: i32,
) -> Result<(), IntegrityError>
where
    L: CatalogLookup + ?Sized,
{
    if !lookup.serie_exists(serie_id).await? {
        return Err(IntegrityError::not_found(
            "SERIES_NOT_FOUND",
            format!("Series with ID '{serie_id}' not found"),
        ));
    }

    if !lookup.season_in_serie(serie_id, season_id).await? {
        return Err(IntegrityError::not_found(
            "SEASON_NOT_FOUND",
            format!("Season with ID '{season_id}' not found"),
        ));
    }

    if lookup.episode_number_taken(season_id, episode_number).await? {
        return Err(IntegrityError::conflict("EPISODE_EXISTS", EPISODE_EXISTS));
    }

    Ok(())
}

pub async fn check_new_rating<L>(
    lookup: &L,
    user_id: i32,
    target: RatingTarget,
    target_id: i32,
) -> Result<(), IntegrityError>
where
    L: CatalogLookup + ?Sized,
{
    if !lookup.target_exists(target, target_id).await? {
        return Err(IntegrityError::not_found(
            "TARGET_NOT_FOUND",
            format!("Target with ID '{target_id}' not found"),
        ));
    }

    if lookup.rating_exists(user_id, target, target_id).await? {
        return Err(IntegrityError::conflict("RATING_EXISTS", RATING_EXISTS));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct FakeCatalog {
        series: HashSet<i32>,
        films: HashSet<i32>,
        // (serie_id, season_id, season_number)
        seasons: Vec<(i32, i32, i32)>,
        // (season_id, episode_id, episode_number)
        episodes: Vec<(i32, i32, i32)>,
        ratings: HashSet<(i32, RatingTarget, i32)>,
    }

    #[async_trait]
    impl CatalogLookup for FakeCatalog {
        async fn serie_exists(&self, serie_id: i32) -> anyhow::Result<bool> {
            Ok(self.series.contains(&serie_id))
        }

        async fn season_in_serie(&self, serie_id: i32, season_id: i32) -> anyhow::Result<bool> {
            Ok(self
                .seasons
                .iter()
                .any(|&(serie, id, _)| serie == serie_id && id == season_id))
        }

        async fn season_number_taken(
            &self,
            serie_id: i32,
            season_number: i32,
        ) -> anyhow::Result<bool> {
            Ok(self
                .seasons
                .iter()
                .any(|&(serie, _, number)| serie == serie_id && number == season_number))
        }

        async fn episode_number_taken(
            &self,
            season_id: i32,
            episode_number: i32,
        ) -> anyhow::Result<bool> {
            Ok(self
                .episodes
                .iter()
                .any(|&(season, _, number)| season == season_id && number == episode_number))
        }

        async fn target_exists(
            &self,
            target: RatingTarget,
            target_id: i32,
        ) -> anyhow::Result<bool> {
            Ok(match target {
                RatingTarget::Movie => self.films.contains(&target_id),
                RatingTarget::Episode => self.episodes.iter().any(|&(_, id, _)| id == target_id),
            })
        }

        async fn rating_exists(
            &self,
            user_id: i32,
            target: RatingTarget,
            target_id: i32,
        ) -> anyhow::Result<bool> {
            Ok(self.ratings.contains(&(user_id, target, target_id)))
        }
    }

    struct BrokenCatalog;

    #[async_trait]
    impl CatalogLookup for BrokenCatalog {
        async fn serie_exists(&self, _: i32) -> anyhow::Result<bool> {
            anyhow::bail!("database is locked")
        }
        async fn season_in_serie(&self, _: i32, _: i32) -> anyhow::Result<bool> {
            anyhow::bail!("database is locked")
        }
        async fn season_number_taken(&self, _: i32, _: i32) -> anyhow::Result<bool> {
            anyhow::bail!("database is locked")
        }
        async fn episode_number_taken(&self, _: i32, _: i32) -> anyhow::Result<bool> {
            anyhow::bail!("database is locked")
        }
        async fn target_exists(&self, _: RatingTarget, _: i32) -> anyhow::Result<bool> {
            anyhow::bail!("database is locked")
        }
        async fn rating_exists(&self, _: i32, _: RatingTarget, _: i32) -> anyhow::Result<bool> {
            anyhow::bail!("database is locked")
        }
    }

    fn catalog() -> FakeCatalog {
        FakeCatalog {
            series: HashSet::from([1, 2]),
            films: HashSet::from([10]),
            seasons: vec![(1, 100, 1)],
            episodes: vec![(100, 1000, 1)],
            ratings: HashSet::from([(7, RatingTarget::Movie, 10)]),
        }
    }

    #[tokio::test]
    async fn test_season_number_is_unique_per_serie() {
        let catalog = catalog();

        let err = check_new_season(&catalog, 1, 1).await.unwrap_err();
        assert!(matches!(err, IntegrityError::Conflict { code: "SEASON_EXISTS", ref message } if message == SEASON_EXISTS));

        assert!(check_new_season(&catalog, 2, 1).await.is_ok());
        assert!(check_new_season(&catalog, 1, 2).await.is_ok());
    }

    #[tokio::test]
    async fn test_season_needs_existing_serie() {
        let err = check_new_season(&catalog(), 10, 1).await.unwrap_err();
        assert!(matches!(err, IntegrityError::NotFound { code: "SERIES_NOT_FOUND", ref message } if message == "Series with ID '10' not found"));
    }

    #[tokio::test]
    async fn test_episode_parents() {
        let catalog = catalog();

        let err = check_new_episode(&catalog, 9, 100, 2).await.unwrap_err();
        assert!(matches!(err, IntegrityError::NotFound { code: "SERIES_NOT_FOUND", .. }));

        // season 100 belongs to serie 1, not serie 2
        let err = check_new_episode(&catalog, 2, 100, 2).await.unwrap_err();
        assert!(matches!(err, IntegrityError::NotFound { code: "SEASON_NOT_FOUND", ref message } if message == "Season with ID '100' not found"));

        let err = check_new_episode(&catalog, 1, 100, 1).await.unwrap_err();
        assert!(matches!(err, IntegrityError::Conflict { ref message, .. } if message == EPISODE_EXISTS));

        assert!(check_new_episode(&catalog, 1, 100, 2).await.is_ok());
    }

    #[tokio::test]
    async fn test_rating_rules() {
        let catalog = catalog();

        let err = check_new_rating(&catalog, 7, RatingTarget::Movie, 99)
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrityError::NotFound { ref message, .. } if message == "Target with ID '99' not found"));

        // a serie id is not a movie
        let err = check_new_rating(&catalog, 7, RatingTarget::Movie, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrityError::NotFound { .. }));

        let err = check_new_rating(&catalog, 7, RatingTarget::Movie, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrityError::Conflict { code: "RATING_EXISTS", ref message } if message == RATING_EXISTS));

        assert!(check_new_rating(&catalog, 8, RatingTarget::Movie, 10).await.is_ok());
        assert!(check_new_rating(&catalog, 7, RatingTarget::Episode, 1000).await.is_ok());
    }

    #[tokio::test]
    async fn test_lookup_faults_are_not_validation_outcomes() {
        let err = check_new_season(&BrokenCatalog, 1, 1).await.unwrap_err();
        assert!(matches!(err, IntegrityError::Lookup(_)));
    }
}
