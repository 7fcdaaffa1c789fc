use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::platform::{PostKind, PostMetadata, PostNode, ProfileMetadata, StoryNode};

// --- Common ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub username: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeCount {
    #[serde(default)]
    pub count: u64,
}

/// Fields Instagram attaches to failed or gated API responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub require_login: bool,
}

impl ApiStatus {
    pub fn requires_login(&self) -> bool {
        self.require_login || self.message.as_deref() == Some("login_required")
    }

    pub fn failed(&self) -> bool {
        self.status.as_deref().is_some_and(|status| status != "ok")
    }
}

// --- XDTGraphMedia ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<ShortcodeMediaData>,
    #[serde(flatten)]
    pub status: ApiStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortcodeMediaData {
    #[serde(default)]
    pub xdt_shortcode_media: Option<XDTGraphMedia>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XDTGraphMedia {
    #[serde(rename = "__typename")]
    pub typename: String,
    pub shortcode: String,
    #[serde(default)]
    pub display_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub is_video: bool,
    pub owner: Owner,
    #[serde(default)]
    pub edge_media_to_caption: EdgeMediaToCaption,
    #[serde(default)]
    pub edge_media_preview_like: Option<EdgeCount>,
    #[serde(default)]
    pub edge_liked_by: Option<EdgeCount>,
    #[serde(default)]
    pub edge_sidecar_to_children: Option<EdgeSidecarToChildren>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeMediaToCaption {
    #[serde(default)]
    pub edges: Vec<EdgeMediaToCaptionEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeMediaToCaptionEdge {
    pub node: EdgeMediaToCaptionNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeMediaToCaptionNode {
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeSidecarToChildren {
    #[serde(default)]
    pub edges: Vec<SidecarEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidecarEdge {
    pub node: SidecarNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidecarNode {
    #[serde(default)]
    pub display_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub is_video: bool,
}

impl From<XDTGraphMedia> for PostMetadata {
    fn from(media: XDTGraphMedia) -> Self {
        let kind = PostKind::from_typename(&media.typename);

        let nodes = match (kind, media.edge_sidecar_to_children) {
            (PostKind::Sidecar, Some(children)) => children
                .edges
                .into_iter()
                .map(|edge| PostNode {
                    is_video: edge.node.is_video,
                    video_url: edge.node.video_url,
                    display_url: edge.node.display_url,
                })
                .collect(),
            (PostKind::Sidecar, None) => Vec::new(),
            _ => vec![PostNode {
                is_video: media.is_video || kind == PostKind::Video,
                video_url: media.video_url,
                display_url: media.display_url,
            }],
        };

        let likes = media
            .edge_media_preview_like
            .or(media.edge_liked_by)
            .map(|edge| edge.count);

        let caption = media
            .edge_media_to_caption
            .edges
            .into_iter()
            .next()
            .map(|edge| edge.node.text)
            .filter(|text| !text.is_empty());

        PostMetadata {
            shortcode: media.shortcode,
            owner_username: media.owner.username,
            likes,
            kind,
            caption,
            nodes,
        }
    }
}

// --- Profile ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebProfileInfo {
    #[serde(default)]
    pub data: Option<WebProfileData>,
    #[serde(flatten)]
    pub status: ApiStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebProfileData {
    #[serde(default)]
    pub user: Option<ProfileUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub is_private: bool,
}

impl From<ProfileUser> for ProfileMetadata {
    fn from(user: ProfileUser) -> Self {
        ProfileMetadata {
            id: user.id,
            username: user.username,
            is_private: user.is_private,
        }
    }
}

// --- Stories ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStoryFeed {
    #[serde(default)]
    pub reel: Option<StoryReel>,
    #[serde(flatten)]
    pub status: ApiStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryReel {
    #[serde(default)]
    pub items: Vec<StoryReelItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryReelItem {
    /// 1 = image, 2 = video
    #[serde(default)]
    pub media_type: u8,
    #[serde(default)]
    pub taken_at: Option<i64>,
    #[serde(default)]
    pub video_versions: Vec<MediaVersion>,
    #[serde(default)]
    pub image_versions2: Option<ImageVersions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageVersions {
    #[serde(default)]
    pub candidates: Vec<MediaVersion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaVersion {
    pub url: String,
}

impl From<StoryReelItem> for StoryNode {
    fn from(item: StoryReelItem) -> Self {
        StoryNode {
            is_video: item.media_type == 2,
            video_url: item.video_versions.into_iter().next().map(|v| v.url),
            image_url: item
                .image_versions2
                .and_then(|versions| versions.candidates.into_iter().next())
                .map(|v| v.url),
            taken_at: item.taken_at.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        }
    }
}
