use crate::entities::{episodes, prelude::*, seasons};
use crate::models::episode::{Episode, NewEpisode, Season};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

/// Seasons and the episodes they own.
pub struct SeasonRepository {
    conn: DatabaseConnection,
}

impl SeasonRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_serie(&self, serie_id: i32) -> Result<Vec<Season>> {
        let rows = Seasons::find()
            .filter(seasons::Column::SerieId.eq(serie_id))
            .order_by_asc(seasons::Column::SeasonNumber)
            .all(&self.conn)
            .await
            .context("Failed to list seasons")?;

        Ok(rows.into_iter().map(Season::from).collect())
    }

    pub async fn get_in_serie(&self, serie_id: i32, season_id: i32) -> Result<Option<Season>> {
        let row = Seasons::find_by_id(season_id)
            .filter(seasons::Column::SerieId.eq(serie_id))
            .one(&self.conn)
            .await
            .context("Failed to query season")?;

        Ok(row.map(Season::from))
    }

    pub async fn find_by_number(&self, serie_id: i32, season_number: i32) -> Result<Option<Season>> {
        let row = Seasons::find()
            .filter(seasons::Column::SerieId.eq(serie_id))
            .filter(seasons::Column::SeasonNumber.eq(season_number))
            .one(&self.conn)
            .await
            .context("Failed to query season by number")?;

        Ok(row.map(Season::from))
    }

    pub async fn insert(
        &self,
        serie_id: i32,
        season_number: i32,
        release_date: NaiveDate,
    ) -> Result<Season> {
        let active = seasons::ActiveModel {
            serie_id: Set(serie_id),
            season_number: Set(season_number),
            release_date: Set(release_date.format("%Y-%m-%d").to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert season")?;

        info!(serie_id, season_number, "Added season {}", model.id);
        Ok(model.into())
    }

    pub async fn list_episodes_for_serie(&self, serie_id: i32) -> Result<Vec<Episode>> {
        let rows = Episodes::find()
            .filter(episodes::Column::SerieId.eq(serie_id))
            .order_by_asc(episodes::Column::SeasonId)
            .order_by_asc(episodes::Column::EpisodeNumber)
            .all(&self.conn)
            .await
            .context("Failed to list episodes for serie")?;

        Ok(rows.into_iter().map(Episode::from).collect())
    }

    pub async fn list_episodes(
        &self,
        season_id: i32,
        min_duration: Option<i32>,
        max_duration: Option<i32>,
    ) -> Result<Vec<Episode>> {
        let mut query = Episodes::find().filter(episodes::Column::SeasonId.eq(season_id));

        if let Some(min) = min_duration {
            query = query.filter(episodes::Column::Duration.gte(min));
        }
        if let Some(max) = max_duration {
            query = query.filter(episodes::Column::Duration.lte(max));
        }

        let rows = query
            .order_by_asc(episodes::Column::EpisodeNumber)
            .all(&self.conn)
            .await
            .context("Failed to list episodes")?;

        Ok(rows.into_iter().map(Episode::from).collect())
    }

    pub async fn get_episode(&self, episode_id: i32) -> Result<Option<Episode>> {
        let row = Episodes::find_by_id(episode_id)
            .one(&self.conn)
            .await
            .context("Failed to query episode")?;

        Ok(row.map(Episode::from))
    }

    pub async fn episode_exists(&self, episode_id: i32) -> Result<bool> {
        Ok(Episodes::find_by_id(episode_id).count(&self.conn).await? > 0)
    }

    pub async fn episode_number_taken(&self, season_id: i32, episode_number: i32) -> Result<bool> {
        let count = Episodes::find()
            .filter(episodes::Column::SeasonId.eq(season_id))
            .filter(episodes::Column::EpisodeNumber.eq(episode_number))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    pub async fn insert_episode(&self, new: NewEpisode) -> Result<Episode> {
        let active = episodes::ActiveModel {
            season_id: Set(new.season_id),
            serie_id: Set(new.serie_id),
            title: Set(new.title),
            episode_number: Set(new.episode_number),
            duration: Set(new.duration),
            watched: Set(false),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert episode")?;

        info!(
            season_id = model.season_id,
            episode_number = model.episode_number,
            "Added episode {}",
            model.id
        );
        Ok(model.into())
    }

    /// Returns the updated episode, or `None` when it does not exist.
    pub async fn set_watched(&self, episode_id: i32, watched: bool) -> Result<Option<Episode>> {
        let Some(model) = Episodes::find_by_id(episode_id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: episodes::ActiveModel = model.into();
        active.watched = Set(watched);
        let model = active.update(&self.conn).await?;

        Ok(Some(model.into()))
    }
}
