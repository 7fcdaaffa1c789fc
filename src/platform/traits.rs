use async_trait::async_trait;

use super::{instagram::InstagramError, PostMetadata, ProfileMetadata, StoryNode};

/// Source of public post, profile and story metadata.
///
/// Implementations are stateless per call; the handlers share one behind an `Arc`.
#[async_trait]
pub trait MediaScraper: Send + Sync {
    fn platform_name(&self) -> &str;

    async fn fetch_post(&self, shortcode: &str) -> Result<PostMetadata, InstagramError>;

    async fn fetch_profile(&self, username: &str) -> Result<ProfileMetadata, InstagramError>;

    /// Current story items for a profile id, oldest first. Empty when none are live.
    async fn fetch_stories(&self, profile: &ProfileMetadata) -> Result<Vec<StoryNode>, InstagramError>;
}
