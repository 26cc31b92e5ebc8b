use crate::entities::{prelude::*, system_logs};
use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};

pub struct LogRepository {
    conn: DatabaseConnection,
}

impl LogRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(
        &self,
        event_type: &str,
        level: &str,
        message: &str,
        details: Option<String>,
        correlation_id: Option<String>,
    ) -> Result<()> {
        let active_model = system_logs::ActiveModel {
            event_type: Set(event_type.to_string()),
            level: Set(level.to_string()),
            message: Set(message.to_string()),
            details: Set(details),
            correlation_id: Set(correlation_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        SystemLogs::insert(active_model).exec(&self.conn).await?;
        Ok(())
    }

    pub async fn latest(&self) -> Result<Option<system_logs::Model>> {
        let row = SystemLogs::find()
            .order_by_desc(system_logs::Column::Id)
            .one(&self.conn)
            .await?;

        Ok(row)
    }
}
