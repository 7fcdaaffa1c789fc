use std::fmt::{self, Display};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

pub const MAX_CAPTION_DISPLAY: usize = 250;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn from_is_video(is_video: bool) -> Self {
        if is_video {
            Self::Video
        } else {
            Self::Image
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Which result family a lean record or download link belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaKind {
    Post,
    Story,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PostKind {
    Image,
    Video,
    Sidecar,
}

impl PostKind {
    pub fn from_typename(typename: &str) -> Self {
        if typename.ends_with("Sidecar") {
            Self::Sidecar
        } else if typename.ends_with("Video") {
            Self::Video
        } else {
            Self::Image
        }
    }
}

impl Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "GraphImage"),
            Self::Video => write!(f, "GraphVideo"),
            Self::Sidecar => write!(f, "GraphSidecar"),
        }
    }
}

// ------------------------------------------------------------
// Raw scraper output

#[derive(Debug, Clone, PartialEq)]
pub struct PostNode {
    pub is_video: bool,
    pub video_url: Option<String>,
    pub display_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostMetadata {
    pub shortcode: String,
    pub owner_username: String,
    pub likes: Option<u64>,
    pub kind: PostKind,
    pub caption: Option<String>,
    /// The post itself for single media, the children for a sidecar.
    pub nodes: Vec<PostNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileMetadata {
    pub id: String,
    pub username: String,
    pub is_private: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoryNode {
    pub is_video: bool,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub taken_at: Option<DateTime<Utc>>,
}

// ------------------------------------------------------------
// Normalized results

#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Pending,
    Ready(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub index: usize,
    pub is_video: bool,
    pub download_url: Url,
    pub preview_url: Url,
    pub preview: Preview,
}

impl MediaItem {
    pub fn media_type(&self) -> MediaType {
        MediaType::from_is_video(self.is_video)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostResult {
    pub shortcode: String,
    pub username: String,
    pub likes: Option<u64>,
    pub kind: PostKind,
    pub full_caption: String,
    pub caption: String,
    pub media_items: Vec<MediaItem>,
}

impl PostResult {
    pub fn likes_display(&self) -> String {
        match self.likes {
            Some(likes) if likes > 0 => likes.to_string(),
            _ => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoryItem {
    pub item: MediaItem,
    pub taken_at: Option<DateTime<Utc>>,
    pub taken_at_relative: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoryResult {
    pub username: String,
    pub story_items: Vec<StoryItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Post(PostResult),
    Story(StoryResult),
}

impl FetchOutcome {
    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Post(_) => MediaKind::Post,
            Self::Story(_) => MediaKind::Story,
        }
    }

    pub fn items(&self) -> Vec<&MediaItem> {
        match self {
            Self::Post(post) => post.media_items.iter().collect(),
            Self::Story(story) => story.story_items.iter().map(|s| &s.item).collect(),
        }
    }

    pub fn items_mut(&mut self) -> Vec<&mut MediaItem> {
        match self {
            Self::Post(post) => post.media_items.iter_mut().collect(),
            Self::Story(story) => story.story_items.iter_mut().map(|s| &mut s.item).collect(),
        }
    }
}

/// Cuts a caption to the display budget, counting characters rather than bytes.
pub fn truncate_caption(caption: &str) -> String {
    if caption.chars().count() > MAX_CAPTION_DISPLAY {
        let head: String = caption.chars().take(MAX_CAPTION_DISPLAY).collect();
        format!("{}...", head)
    } else {
        caption.to_string()
    }
}
