use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

async fn create<E>(manager: &SchemaManager<'_>, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .create_table(
            schema
                .create_table_from_entity(entity)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        // parents before children
        create(manager, &schema, Media).await?;
        create(manager, &schema, Seasons).await?;
        create(manager, &schema, Episodes).await?;
        create(manager, &schema, Users).await?;
        create(manager, &schema, Favorites).await?;
        create(manager, &schema, Ratings).await?;
        create(manager, &schema, SystemLogs).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SystemLogs).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ratings).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Favorites).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Episodes).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Seasons).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Media).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
