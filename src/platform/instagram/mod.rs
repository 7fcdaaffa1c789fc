mod error;
pub mod model;
mod util;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Response, StatusCode,
};
use serde::de::DeserializeOwned;

pub use error::*;
pub use util::*;

use model::{GraphQlResponse, UserStoryFeed, WebProfileInfo};

use crate::{
    config::InstagramConfig,
    service::http::{HttpClient, HttpService},
};

use super::{traits::MediaScraper, PostMetadata, ProfileMetadata, StoryNode};

pub struct PlatformInstagram {
    http_service: HttpService,
    config: InstagramConfig,
}

#[async_trait]
impl MediaScraper for PlatformInstagram {
    fn platform_name(&self) -> &str {
        "Instagram"
    }

    async fn fetch_post(&self, shortcode: &str) -> Result<PostMetadata, InstagramError> {
        debug!("Fetching post {}", shortcode);

        let variables = serde_json::json!({
            "shortcode": shortcode
        });

        let params = serde_json::json!({
            "doc_id": self.config.doc_id,
            "variables": variables.to_string(),
            "server_timestamps": "true",
        });

        let response = self
            .http_service
            .get_query(&self.config.graphql_url, Some(params), self.api_headers())
            .await
            .map_err(InstagramError::from_transport)?;

        let response = Self::check_response(response, shortcode)?;
        let payload = Self::read_json::<GraphQlResponse>(response, shortcode).await?;

        if payload.status.requires_login() {
            return Err(InstagramError::LoginRequired(shortcode.to_string()));
        }

        // Instagram answers `"status": "ok"` with a null media for deleted or unknown posts.
        match payload.data.and_then(|data| data.xdt_shortcode_media) {
            Some(media) => Ok(media.into()),
            None if payload.status.failed() => Err(InstagramError::Upstream(
                payload.status.message.unwrap_or_else(|| "Unknown error".to_string()),
            )),
            None => Err(InstagramError::PostNotFound(shortcode.to_string())),
        }
    }

    async fn fetch_profile(&self, username: &str) -> Result<ProfileMetadata, InstagramError> {
        debug!("Fetching profile {}", username);

        let url = format!("{}/api/v1/users/web_profile_info/", self.api_base());
        let params = serde_json::json!({ "username": username });

        let response = self
            .http_service
            .get_query(&url, Some(params), self.api_headers())
            .await
            .map_err(InstagramError::from_transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(InstagramError::ProfileNotFound(username.to_string()));
        }

        let response = Self::check_response(response, username)?;
        let payload = Self::read_json::<WebProfileInfo>(response, username).await?;

        if payload.status.requires_login() {
            return Err(InstagramError::LoginRequired(username.to_string()));
        }

        payload
            .data
            .and_then(|data| data.user)
            .map(ProfileMetadata::from)
            .ok_or_else(|| InstagramError::ProfileNotFound(username.to_string()))
    }

    async fn fetch_stories(&self, profile: &ProfileMetadata) -> Result<Vec<StoryNode>, InstagramError> {
        if profile.is_private {
            return Err(InstagramError::PrivateProfile(profile.username.clone()));
        }

        debug!("Fetching stories for {} ({})", profile.username, profile.id);

        let url = format!("{}/api/v1/feed/user/{}/story/", self.api_base(), profile.id);

        let response = self
            .http_service
            .get_query(&url, None, self.api_headers())
            .await
            .map_err(InstagramError::from_transport)?;

        let response = Self::check_response(response, &profile.username)?;
        let payload = Self::read_json::<UserStoryFeed>(response, &profile.username).await?;

        if payload.status.requires_login() {
            return Err(InstagramError::LoginRequired(profile.username.clone()));
        }

        let mut stories: Vec<StoryNode> = payload
            .reel
            .map(|reel| reel.items.into_iter().map(StoryNode::from).collect())
            .unwrap_or_default();

        stories.sort_by_key(|story| story.taken_at);

        Ok(stories)
    }
}

impl PlatformInstagram {
    pub fn new(config: InstagramConfig) -> Result<Self, InstagramError> {
        let http_service = HttpService::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self { http_service, config })
    }

    fn api_base(&self) -> &str {
        self.config.api_url.trim_end_matches('/')
    }

    fn api_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        match HeaderValue::from_str(&self.config.app_id) {
            Ok(app_id) => {
                headers.insert("X-IG-App-ID", app_id);
            }
            Err(e) => warn!("Skipping malformed Instagram app id: {}", e),
        }
        headers
    }

    /// Maps HTTP-level failures onto [`InstagramError`], naming `identifier` where it helps.
    fn check_response(response: Response, identifier: &str) -> Result<Response, InstagramError> {
        if response.url().path().starts_with("/accounts/login") {
            return Err(InstagramError::LoginRequired(identifier.to_string()));
        }

        let status = response.status();
        match status {
            s if s.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(InstagramError::QueryReturnedNotFound(identifier.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(InstagramError::TooManyRequests(format!(
                "Instagram is rate limiting requests ({})",
                status
            ))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(InstagramError::LoginRequired(identifier.to_string()))
            }
            _ => Err(InstagramError::Upstream(format!(
                "Unexpected status {} for '{}'",
                status, identifier
            ))),
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response, identifier: &str) -> Result<T, InstagramError> {
        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                InstagramError::Upstream(format!("Unexpected response for '{}': {}", identifier, e))
            } else {
                InstagramError::from_transport(e)
            }
        })
    }
}
