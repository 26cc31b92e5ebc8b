use crate::domain::{MediaKind, RatingTarget};
use crate::entities::{episodes, favorites, media, prelude::*, ratings, seasons};
use crate::models::media::{Media as MediaRecord, MediaFilter, MediaUpdate, NewMedia};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use tracing::info;

pub struct MediaRepository {
    conn: DatabaseConnection,
}

impl MediaRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn filtered(filter: &MediaFilter) -> Select<Media> {
        let mut cond = Condition::all();

        if let Some(kind) = filter.kind {
            cond = cond.add(media::Column::Kind.eq(kind.as_str()));
        }
        if let Some(title) = &filter.title {
            // SQLite LIKE is case-insensitive for ASCII
            cond = cond.add(media::Column::Title.contains(title.as_str()));
        }
        if let Some(genre) = &filter.genre {
            cond = cond.add(media::Column::Genre.eq(genre.as_str()));
        }
        if let Some(year) = filter.year {
            cond = cond.add(media::Column::Year.eq(year));
        }
        if let Some(min) = filter.min_year {
            cond = cond.add(media::Column::Year.gte(min));
        }
        if let Some(max) = filter.max_year {
            cond = cond.add(media::Column::Year.lte(max));
        }
        if let Some(min) = filter.min_duration {
            cond = cond.add(media::Column::Duration.gte(min));
        }
        if let Some(max) = filter.max_duration {
            cond = cond.add(media::Column::Duration.lte(max));
        }
        if let Some(status) = filter.status {
            cond = cond.add(media::Column::Status.eq(status.as_str()));
        }

        Media::find().filter(cond)
    }

    pub async fn list(&self, filter: &MediaFilter) -> Result<Vec<MediaRecord>> {
        let rows = Self::filtered(filter)
            .order_by_asc(media::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list media")?;

        Ok(rows.into_iter().map(MediaRecord::from).collect())
    }

    /// One page of matches plus the total match count. `page` starts at 1.
    pub async fn page(
        &self,
        filter: &MediaFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<MediaRecord>, u64)> {
        let paginator = Self::filtered(filter)
            .order_by_desc(media::Column::CreatedAt)
            .order_by_desc(media::Column::Id)
            .paginate(&self.conn, limit);

        let total = paginator.num_items().await?;
        let index = page.saturating_sub(1);
        if index.checked_mul(limit).is_none_or(|offset| offset > total) {
            return Ok((Vec::new(), total));
        }
        let rows = paginator.fetch_page(index).await?;

        Ok((rows.into_iter().map(MediaRecord::from).collect(), total))
    }

    pub async fn get(&self, id: i32) -> Result<Option<MediaRecord>> {
        let row = Media::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query media by ID")?;

        Ok(row.map(MediaRecord::from))
    }

    /// Records for `ids`, in the order the ids are given. Unknown ids are skipped.
    pub async fn list_by_ids(&self, ids: &[i32]) -> Result<Vec<MediaRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Media::find()
            .filter(media::Column::Id.is_in(ids.to_vec()))
            .all(&self.conn)
            .await
            .context("Failed to query media by IDs")?;

        let mut records: Vec<MediaRecord> = rows.into_iter().map(MediaRecord::from).collect();
        records.sort_by_key(|m| ids.iter().position(|id| *id == m.id));
        Ok(records)
    }

    pub async fn get_of_kind(&self, id: i32, kind: MediaKind) -> Result<Option<MediaRecord>> {
        let row = Media::find_by_id(id)
            .filter(media::Column::Kind.eq(kind.as_str()))
            .one(&self.conn)
            .await
            .context("Failed to query media by ID and type")?;

        Ok(row.map(MediaRecord::from))
    }

    pub async fn exists_of_kind(&self, id: i32, kind: MediaKind) -> Result<bool> {
        let count = Media::find_by_id(id)
            .filter(media::Column::Kind.eq(kind.as_str()))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    pub async fn insert(&self, new: NewMedia) -> Result<MediaRecord> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = media::ActiveModel {
            kind: Set(new.kind.as_str().to_string()),
            title: Set(new.title),
            genre: Set(new.genre),
            year: Set(new.year),
            rating: Set(new.rating),
            platform: Set(new.platform),
            duration: Set(new.duration),
            status: Set(new.status.map(|s| s.as_str().to_string())),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert media")?;

        info!(media_id = model.id, kind = %model.kind, "Added media: {}", model.title);
        Ok(model.into())
    }

    /// Applies the set fields of `update`. Returns `None` when no such media exists.
    pub async fn update(&self, id: i32, update: MediaUpdate) -> Result<Option<MediaRecord>> {
        let Some(model) = Media::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: media::ActiveModel = model.into();
        if let Some(title) = update.title {
            active.title = Set(title);
        }
        if let Some(genre) = update.genre {
            active.genre = Set(Some(genre));
        }
        if let Some(year) = update.year {
            active.year = Set(Some(year));
        }
        if let Some(rating) = update.rating {
            active.rating = Set(Some(rating));
        }
        if let Some(platform) = update.platform {
            active.platform = Set(platform);
        }
        if let Some(duration) = update.duration {
            active.duration = Set(Some(duration));
        }
        if let Some(status) = update.status {
            active.status = Set(Some(status.as_str().to_string()));
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update media")?;

        Ok(Some(model.into()))
    }

    /// Deletes a media record and everything hanging off it in one transaction:
    /// seasons, episodes, ratings on the film or its episodes, and favorites.
    pub async fn delete_cascade(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let season_ids: Vec<i32> = Seasons::find()
            .select_only()
            .column(seasons::Column::Id)
            .filter(seasons::Column::SerieId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        let episode_ids: Vec<i32> = Episodes::find()
            .select_only()
            .column(episodes::Column::Id)
            .filter(episodes::Column::SerieId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        Ratings::delete_many()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(ratings::Column::Target.eq(RatingTarget::Movie.as_str()))
                            .add(ratings::Column::TargetId.eq(id)),
                    )
                    .add(
                        Condition::all()
                            .add(ratings::Column::Target.eq(RatingTarget::Episode.as_str()))
                            .add(ratings::Column::TargetId.is_in(episode_ids.clone())),
                    ),
            )
            .exec(&txn)
            .await?;

        Episodes::delete_many()
            .filter(episodes::Column::SerieId.eq(id))
            .exec(&txn)
            .await?;

        Seasons::delete_many()
            .filter(seasons::Column::Id.is_in(season_ids.clone()))
            .exec(&txn)
            .await?;

        Favorites::delete_many()
            .filter(favorites::Column::MediaId.eq(id))
            .exec(&txn)
            .await?;

        let result = Media::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!(
                media_id = id,
                seasons = season_ids.len(),
                episodes = episode_ids.len(),
                "Removed media with ID: {}",
                id
            );
        }
        Ok(removed)
    }
}
