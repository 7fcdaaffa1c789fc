use std::collections::HashMap;

use url::Url;

use crate::platform::{FetchOutcome, MediaKind};

/// Opaque per-browser session id, the uuid part of the signed cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(pub(super) String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeanItem {
    pub index: usize,
    pub is_video: bool,
    pub download_url: Url,
}

/// What a download needs to know about a fetch, minus captions and previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub kind: MediaKind,
    /// Shortcode for posts, lowercased username for stories.
    pub identifier: String,
    pub username: String,
    pub items: Vec<LeanItem>,
}

impl SessionRecord {
    pub fn key_for(kind: MediaKind, identifier: &str) -> String {
        match kind {
            MediaKind::Post => format!("post_info_{}", identifier),
            MediaKind::Story => format!("story_info_{}", identifier),
        }
    }

    pub fn key(&self) -> String {
        Self::key_for(self.kind, &self.identifier)
    }

    pub fn item(&self, index: usize) -> Option<&LeanItem> {
        self.items.iter().find(|item| item.index == index)
    }
}

impl From<&FetchOutcome> for SessionRecord {
    fn from(outcome: &FetchOutcome) -> Self {
        let (identifier, username) = match outcome {
            FetchOutcome::Post(post) => (post.shortcode.clone(), post.username.clone()),
            FetchOutcome::Story(story) => (story.username.clone(), story.username.clone()),
        };

        let items = outcome
            .items()
            .into_iter()
            .map(|item| LeanItem {
                index: item.index,
                is_video: item.is_video,
                download_url: item.download_url.clone(),
            })
            .collect();

        Self {
            kind: outcome.kind(),
            identifier,
            username,
            items,
        }
    }
}

/// Everything the server keeps for one browser session.
#[derive(Debug, Clone, Default)]
pub struct SessionEntry {
    pub records: HashMap<String, SessionRecord>,
    pub flashes: Vec<Flash>,
}
