use chrono::{DateTime, Utc};
use url::Url;

use crate::platform::{
    truncate_caption, MediaItem, PostMetadata, PostResult, Preview, StoryItem, StoryNode, StoryResult,
};

pub const NO_CAPTION: &str = "No caption";
pub const UNKNOWN_TIME: &str = "Unknown time";

fn absolute_url(raw: Option<&str>) -> Option<Url> {
    let url = Url::parse(raw?).ok()?;
    url.has_host().then_some(url)
}

/// Builds an item when both URLs resolve; `None` means the node is skipped.
fn media_item(index: usize, is_video: bool, download: Option<&str>, preview: Option<&str>) -> Option<MediaItem> {
    Some(MediaItem {
        index,
        is_video,
        download_url: absolute_url(download)?,
        preview_url: absolute_url(preview)?,
        preview: Preview::Pending,
    })
}

/// Flattens a single-media or sidecar post into indexed items.
///
/// Nodes without a usable download or preview URL are dropped before indices
/// are assigned, so indices are always `0..len`.
pub fn normalize_post(post: PostMetadata) -> PostResult {
    let mut media_items = Vec::with_capacity(post.nodes.len());

    for node in &post.nodes {
        let download = if node.is_video {
            node.video_url.as_deref()
        } else {
            node.display_url.as_deref()
        };

        match media_item(media_items.len(), node.is_video, download, node.display_url.as_deref()) {
            Some(item) => media_items.push(item),
            None => debug!("Skipping node without usable URLs in post {}", post.shortcode),
        }
    }

    let full_caption = post.caption.unwrap_or_else(|| NO_CAPTION.to_string());
    let caption = truncate_caption(&full_caption);

    PostResult {
        shortcode: post.shortcode,
        username: post.owner_username,
        likes: post.likes,
        kind: post.kind,
        full_caption,
        caption,
        media_items,
    }
}

pub fn normalize_stories(username: &str, nodes: Vec<StoryNode>, now: DateTime<Utc>) -> StoryResult {
    let mut story_items: Vec<StoryItem> = Vec::with_capacity(nodes.len());

    for node in nodes {
        let download = if node.is_video {
            node.video_url.as_deref()
        } else {
            node.image_url.as_deref()
        };

        let Some(item) = media_item(story_items.len(), node.is_video, download, node.image_url.as_deref()) else {
            debug!("Skipping story item without usable URLs for {}", username);
            continue;
        };

        story_items.push(StoryItem {
            item,
            taken_at: node.taken_at,
            taken_at_relative: humanize_elapsed(node.taken_at, now),
        });
    }

    StoryResult {
        username: username.to_string(),
        story_items,
    }
}

fn plural(count: i64, one: &str, unit: &str) -> String {
    if count == 1 {
        format!("{} ago", one)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

/// "3 hours ago" style rendering of `taken_at` relative to `now`.
pub fn humanize_elapsed(taken_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(taken_at) = taken_at else {
        return UNKNOWN_TIME.to_string();
    };

    let secs = (now - taken_at).num_seconds();
    match secs {
        s if s < 1 => "now".to_string(),
        s if s < 60 => plural(s, "a second", "second"),
        s if s < 3_600 => plural(s / 60, "a minute", "minute"),
        s if s < 86_400 => plural(s / 3_600, "an hour", "hour"),
        s if s < 30 * 86_400 => plural(s / 86_400, "a day", "day"),
        s if s < 365 * 86_400 => plural(s / (30 * 86_400), "a month", "month"),
        s => plural(s / (365 * 86_400), "a year", "year"),
    }
}
