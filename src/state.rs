use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::AppResult,
    platform::{MediaScraper, PlatformInstagram},
    service::ServiceRegistry,
};

#[derive(Clone)]
pub struct AppState {
    pub service_registry: ServiceRegistry,
}

impl AppState {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        info!("Registering Instagram scraper");
        let scraper = Arc::new(PlatformInstagram::new(config.instagram.clone())?);

        Self::with_scraper(config, scraper)
    }

    pub fn with_scraper(config: &AppConfig, scraper: Arc<dyn MediaScraper>) -> AppResult<Self> {
        let service_registry = ServiceRegistry::new(config, scraper)?;

        Ok(Self { service_registry })
    }
}
