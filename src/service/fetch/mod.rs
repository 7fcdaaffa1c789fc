mod error;
pub use error::FetchError;

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use crate::{
    platform::{extract_shortcode, process_instagram_username, FetchOutcome, InstagramError, MediaScraper},
    service::{
        metadata::{normalize_post, normalize_stories},
        preview::PreviewService,
    },
};

/// What the form asked for, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTarget {
    Post { shortcode: String },
    Story { username: String },
}

impl FetchTarget {
    pub fn from_form(fetch_type: Option<&str>, url: Option<&str>, username: Option<&str>) -> Result<Self, FetchError> {
        match fetch_type {
            Some("url") => extract_shortcode(url.unwrap_or_default())
                .map(|shortcode| FetchTarget::Post { shortcode })
                .ok_or(FetchError::InvalidUrl),
            Some("stories") => {
                let raw = username.unwrap_or_default();
                if raw.trim().is_empty() {
                    return Err(FetchError::EmptyUsername);
                }

                match process_instagram_username(raw) {
                    Ok(username) => Ok(FetchTarget::Story { username }),
                    Err(InstagramError::InvalidUsername(message)) => Err(FetchError::InvalidUsername(message)),
                    Err(e) => Err(FetchError::from_instagram(raw.trim(), e)),
                }
            }
            _ => Err(FetchError::InvalidFetchType),
        }
    }
}

/// Scrape, normalize, then attach previews.
#[derive(Clone)]
pub struct FetchService {
    scraper: Arc<dyn MediaScraper>,
    preview: PreviewService,
}

impl FetchService {
    pub fn new(scraper: Arc<dyn MediaScraper>, preview: PreviewService) -> Self {
        info!("Fetch service using {} scraper", scraper.platform_name());
        Self { scraper, preview }
    }

    /// Runs the fetch on its own task so a panic surfaces as `FetchError::Internal`.
    pub async fn fetch(&self, target: &FetchTarget) -> Result<FetchOutcome, FetchError> {
        let service = self.clone();
        let target = target.clone();

        tokio::spawn(async move { service.run(&target).await })
            .await
            .context("Fetch task aborted")?
    }

    async fn run(&self, target: &FetchTarget) -> Result<FetchOutcome, FetchError> {
        let mut outcome = match target {
            FetchTarget::Post { shortcode } => {
                info!("Fetching post/reel info for shortcode: {}", shortcode);
                let post = self
                    .scraper
                    .fetch_post(shortcode)
                    .await
                    .map_err(|e| FetchError::from_instagram(shortcode, e))?;

                FetchOutcome::Post(normalize_post(post))
            }
            FetchTarget::Story { username } => {
                info!("Fetching stories for username: {}", username);
                let profile = self
                    .scraper
                    .fetch_profile(username)
                    .await
                    .map_err(|e| FetchError::from_instagram(username, e))?;

                let nodes = self
                    .scraper
                    .fetch_stories(&profile)
                    .await
                    .map_err(|e| FetchError::from_instagram(username, e))?;

                if nodes.is_empty() {
                    return Err(FetchError::NoStories(username.clone()));
                }

                info!("Found {} story items for {}", nodes.len(), username);
                FetchOutcome::Story(normalize_stories(username, nodes, Utc::now()))
            }
        };

        if outcome.items().is_empty() {
            return Err(FetchError::NoDownloadableItems);
        }

        for item in outcome.items_mut() {
            let preview = self.preview.fetch(Some(&item.preview_url)).await;
            item.preview = preview;
        }

        Ok(outcome)
    }
}
