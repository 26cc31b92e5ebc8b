use crate::domain::RatingTarget;
use crate::entities::{prelude::*, ratings};
use crate::models::rating::{NewRating, Rating};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};

pub struct RatingRepository {
    conn: DatabaseConnection,
}

impl RatingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, user_id: i32, new: NewRating) -> Result<Rating> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = ratings::ActiveModel {
            user_id: Set(user_id),
            target: Set(new.target.as_str().to_string()),
            target_id: Set(new.target_id),
            score: Set(new.score),
            review: Set(new.review),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert rating")?;

        Ok(model.into())
    }

    pub async fn exists(&self, user_id: i32, target: RatingTarget, target_id: i32) -> Result<bool> {
        let count = Ratings::find()
            .filter(ratings::Column::UserId.eq(user_id))
            .filter(ratings::Column::Target.eq(target.as_str()))
            .filter(ratings::Column::TargetId.eq(target_id))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    /// Every score recorded against any of `target_ids`.
    pub async fn scores(&self, target: RatingTarget, target_ids: Vec<i32>) -> Result<Vec<f64>> {
        if target_ids.is_empty() {
            return Ok(Vec::new());
        }

        let scores: Vec<f64> = Ratings::find()
            .select_only()
            .column(ratings::Column::Score)
            .filter(ratings::Column::Target.eq(target.as_str()))
            .filter(ratings::Column::TargetId.is_in(target_ids))
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to query rating scores")?;

        Ok(scores)
    }
}
