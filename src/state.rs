use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CatalogService, LogService, RatingService, SeaOrmAuthService,
    SeaOrmCatalogService, SeaOrmRatingService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub catalog_service: Arc<dyn CatalogService>,

    pub rating_service: Arc<dyn RatingService>,

    pub auth_service: Arc<dyn AuthService>,

    pub log_service: Arc<LogService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::from_config(&config).await?;
        Ok(Self::with_store(config, store))
    }

    /// Wires every service around an already migrated store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let catalog_service =
            Arc::new(SeaOrmCatalogService::new(store.clone())) as Arc<dyn CatalogService>;

        let rating_service =
            Arc::new(SeaOrmRatingService::new(store.clone())) as Arc<dyn RatingService>;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let log_service = Arc::new(LogService::new(store.clone()));

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            catalog_service,
            rating_service,
            auth_service,
            log_service,
        }
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
