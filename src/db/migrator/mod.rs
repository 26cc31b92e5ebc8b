use sea_orm_migration::prelude::*;

mod m20250301_create_catalog;
mod m20250302_unique_keys;
mod m20250303_seed_admin;

pub use m20250303_seed_admin::DEFAULT_API_KEY;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_create_catalog::Migration),
            Box::new(m20250302_unique_keys::Migration),
            Box::new(m20250303_seed_admin::Migration),
        ]
    }
}
