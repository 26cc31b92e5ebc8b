use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const UP: [&str; 7] = [
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_seasons_serie_number ON seasons(serie_id, season_number)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_episodes_season_number ON episodes(season_id, episode_number)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_ratings_user_target ON ratings(user_id, target, target_id)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_favorites_user_media ON favorites(user_id, media_id)",
    "CREATE INDEX IF NOT EXISTS idx_media_type ON media(type)",
    "CREATE INDEX IF NOT EXISTS idx_episodes_serie ON episodes(serie_id)",
    "CREATE INDEX IF NOT EXISTS idx_system_logs_created_at ON system_logs(created_at)",
];

const DOWN: [&str; 7] = [
    "DROP INDEX IF EXISTS idx_seasons_serie_number",
    "DROP INDEX IF EXISTS idx_episodes_season_number",
    "DROP INDEX IF EXISTS idx_ratings_user_target",
    "DROP INDEX IF EXISTS idx_favorites_user_media",
    "DROP INDEX IF EXISTS idx_media_type",
    "DROP INDEX IF EXISTS idx_episodes_serie",
    "DROP INDEX IF EXISTS idx_system_logs_created_at",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for sql in UP {
            conn.execute_unprepared(sql).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for sql in DOWN {
            conn.execute_unprepared(sql).await?;
        }

        Ok(())
    }
}
