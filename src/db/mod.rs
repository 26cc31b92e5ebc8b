use crate::config::{Config, SecurityConfig};
use crate::domain::{MediaKind, RatingTarget, Role};
use crate::models::episode::{Episode, NewEpisode, Season};
use crate::models::media::{Media, MediaFilter, MediaUpdate, NewMedia};
use crate::models::rating::{NewRating, Rating};
use crate::models::user::{ProfileUpdate, User};
use crate::validation::CatalogLookup;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use crate::entities::system_logs::Model as SystemLog;
pub use migrator::DEFAULT_API_KEY;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

/// True when `err` was caused by a unique index rejecting an insert or update.
#[must_use]
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<DbErr>()
            .and_then(DbErr::sql_err)
            .is_some_and(|e| matches!(e, SqlErr::UniqueConstraintViolation(_)))
    })
}

impl Store {
    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn media_repo(&self) -> repositories::media::MediaRepository {
        repositories::media::MediaRepository::new(self.conn.clone())
    }

    fn season_repo(&self) -> repositories::season::SeasonRepository {
        repositories::season::SeasonRepository::new(self.conn.clone())
    }

    fn rating_repo(&self) -> repositories::rating::RatingRepository {
        repositories::rating::RatingRepository::new(self.conn.clone())
    }

    fn logs_repo(&self) -> repositories::logs::LogRepository {
        repositories::logs::LogRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // ========== Media ==========

    pub async fn list_media(&self, filter: &MediaFilter) -> Result<Vec<Media>> {
        self.media_repo().list(filter).await
    }

    pub async fn page_media(
        &self,
        filter: &MediaFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<Media>, u64)> {
        self.media_repo().page(filter, page, limit).await
    }

    pub async fn get_media(&self, id: i32) -> Result<Option<Media>> {
        self.media_repo().get(id).await
    }

    pub async fn media_by_ids(&self, ids: &[i32]) -> Result<Vec<Media>> {
        self.media_repo().list_by_ids(ids).await
    }

    pub async fn get_media_of_kind(&self, id: i32, kind: MediaKind) -> Result<Option<Media>> {
        self.media_repo().get_of_kind(id, kind).await
    }

    pub async fn add_media(&self, new: NewMedia) -> Result<Media> {
        self.media_repo().insert(new).await
    }

    pub async fn update_media(&self, id: i32, update: MediaUpdate) -> Result<Option<Media>> {
        self.media_repo().update(id, update).await
    }

    pub async fn remove_media(&self, id: i32) -> Result<bool> {
        self.media_repo().delete_cascade(id).await
    }

    // ========== Seasons & episodes ==========

    pub async fn list_seasons(&self, serie_id: i32) -> Result<Vec<Season>> {
        self.season_repo().list_for_serie(serie_id).await
    }

    pub async fn get_season(&self, serie_id: i32, season_id: i32) -> Result<Option<Season>> {
        self.season_repo().get_in_serie(serie_id, season_id).await
    }

    pub async fn find_season_by_number(
        &self,
        serie_id: i32,
        season_number: i32,
    ) -> Result<Option<Season>> {
        self.season_repo()
            .find_by_number(serie_id, season_number)
            .await
    }

    pub async fn add_season(
        &self,
        serie_id: i32,
        season_number: i32,
        release_date: NaiveDate,
    ) -> Result<Season> {
        self.season_repo()
            .insert(serie_id, season_number, release_date)
            .await
    }

    pub async fn list_serie_episodes(&self, serie_id: i32) -> Result<Vec<Episode>> {
        self.season_repo().list_episodes_for_serie(serie_id).await
    }

    pub async fn list_episodes(
        &self,
        season_id: i32,
        min_duration: Option<i32>,
        max_duration: Option<i32>,
    ) -> Result<Vec<Episode>> {
        self.season_repo()
            .list_episodes(season_id, min_duration, max_duration)
            .await
    }

    pub async fn get_episode(&self, episode_id: i32) -> Result<Option<Episode>> {
        self.season_repo().get_episode(episode_id).await
    }

    pub async fn add_episode(&self, new: NewEpisode) -> Result<Episode> {
        self.season_repo().insert_episode(new).await
    }

    pub async fn set_episode_watched(&self, episode_id: i32, watched: bool) -> Result<Option<Episode>> {
        self.season_repo().set_watched(episode_id, watched).await
    }

    // ========== Ratings ==========

    pub async fn add_rating(&self, user_id: i32, new: NewRating) -> Result<Rating> {
        self.rating_repo().insert(user_id, new).await
    }

    pub async fn rating_scores(&self, target: RatingTarget, target_ids: Vec<i32>) -> Result<Vec<f64>> {
        self.rating_repo().scores(target, target_ids).await
    }

    // ========== Users ==========

    pub async fn create_user(
        &self,
        email: &str,
        username: &str,
        password: &str,
        role: Role,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(email, username, password, role, security)
            .await
    }

    pub async fn user_identity_taken(
        &self,
        email: Option<&str>,
        username: Option<&str>,
        except_id: Option<i32>,
    ) -> Result<bool> {
        self.user_repo()
            .identity_taken(email, username, except_id)
            .await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_credentials(email, password).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn update_user_profile(
        &self,
        id: i32,
        update: ProfileUpdate,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo().update_profile(id, update, security).await
    }

    pub async fn add_favorite(&self, user_id: i32, media_id: i32) -> Result<bool> {
        self.user_repo().add_favorite(user_id, media_id).await
    }

    pub async fn remove_favorite(&self, user_id: i32, media_id: i32) -> Result<bool> {
        self.user_repo().remove_favorite(user_id, media_id).await
    }

    // ========== System logs ==========

    pub async fn add_log(
        &self,
        event_type: &str,
        level: &str,
        message: &str,
        details: Option<String>,
        correlation_id: Option<String>,
    ) -> Result<()> {
        self.logs_repo()
            .add(event_type, level, message, details, correlation_id)
            .await
    }

    pub async fn latest_log(&self) -> Result<Option<SystemLog>> {
        self.logs_repo().latest().await
    }
}

#[async_trait]
impl CatalogLookup for Store {
    async fn serie_exists(&self, serie_id: i32) -> Result<bool> {
        self.media_repo()
            .exists_of_kind(serie_id, MediaKind::Serie)
            .await
    }

    async fn season_in_serie(&self, serie_id: i32, season_id: i32) -> Result<bool> {
        Ok(self.get_season(serie_id, season_id).await?.is_some())
    }

    async fn season_number_taken(&self, serie_id: i32, season_number: i32) -> Result<bool> {
        Ok(self
            .find_season_by_number(serie_id, season_number)
            .await?
            .is_some())
    }

    async fn episode_number_taken(&self, season_id: i32, episode_number: i32) -> Result<bool> {
        self.season_repo()
            .episode_number_taken(season_id, episode_number)
            .await
    }

    async fn target_exists(&self, target: RatingTarget, target_id: i32) -> Result<bool> {
        match target {
            RatingTarget::Movie => {
                self.media_repo()
                    .exists_of_kind(target_id, MediaKind::Film)
                    .await
            }
            RatingTarget::Episode => self.season_repo().episode_exists(target_id).await,
        }
    }

    async fn rating_exists(
        &self,
        user_id: i32,
        target: RatingTarget,
        target_id: i32,
    ) -> Result<bool> {
        self.rating_repo().exists(user_id, target, target_id).await
    }
}
