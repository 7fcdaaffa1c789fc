use std::{sync::Arc, time::Duration};

use crate::{config::AppConfig, platform::MediaScraper};

pub mod download;
mod error;
pub mod fetch;
pub mod http;
pub mod metadata;
pub mod preview;
pub mod session;

pub use download::DownloadService;
pub use error::ServiceError;
pub use fetch::FetchService;
pub use preview::PreviewService;
pub use session::SessionService;

#[derive(Clone)]
pub struct ServiceRegistry {
    pub fetch: FetchService,
    pub session: SessionService,
    pub download: DownloadService,
}

impl ServiceRegistry {
    pub fn new(config: &AppConfig, scraper: Arc<dyn MediaScraper>) -> Result<Self, ServiceError> {
        info!("Initializing service registry");

        let session = SessionService::new(
            &config.session.secret_key,
            config.session.ttl(),
            config.session.cache_capacity,
        )?;

        let preview = PreviewService::new(
            Duration::from_secs(config.preview.timeout_secs),
            config.preview.max_size,
            config.preview.max_bytes,
        )?;

        let fetch = FetchService::new(scraper, preview);

        let download = DownloadService::new(session.clone(), Duration::from_secs(config.download.timeout_secs))?;

        info!("Service registry initialized");

        Ok(Self {
            fetch,
            session,
            download,
        })
    }
}
