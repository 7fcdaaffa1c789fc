use std::sync::LazyLock;

use anyhow::Context;
use regex::Regex;
use url::Url;

use super::InstagramError;

static SHORTCODE_PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?:p|reel|reels|tv)/([A-Za-z0-9_-]+)")
        .context("Failed to create shortcode path regex")
        .unwrap()
});

static INSTAGRAM_USERNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_](?:[A-Za-z0-9._]*[A-Za-z0-9_])?$")
        .context("Failed to create Instagram username regex")
        .unwrap()
});

/// Pulls the post/reel shortcode out of a pasted URL.
///
/// Only the path takes part in the match, so `?next=/p/XYZ/` style query
/// strings never produce a shortcode. A missing scheme is tolerated.
pub fn extract_shortcode(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let path = url_path(trimmed);

    SHORTCODE_PATH_REGEX
        .captures(&path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn url_path(input: &str) -> String {
    if input.starts_with('/') {
        return strip_query(input);
    }

    match Url::parse(input) {
        Ok(url) if url.has_host() => url.path().to_string(),
        _ => Url::parse(&format!("https://{}", input))
            .map(|url| url.path().to_string())
            .unwrap_or_else(|_| strip_query(input)),
    }
}

fn strip_query(input: &str) -> String {
    input.split(['?', '#']).next().unwrap_or_default().to_string()
}

pub fn validate_instagram_username(username: &str) -> bool {
    INSTAGRAM_USERNAME_REGEX.is_match(username)
}

pub fn normalize_instagram_username(input: &str) -> String {
    input.replace("\\_", "_").trim().to_lowercase()
}

/// Turns form input into a lookup-ready username.
///
/// Accepts bare names, `@name`, and profile URLs.
pub fn process_instagram_username(input: &str) -> Result<String, InstagramError> {
    let normalized = normalize_instagram_username(input);
    let cleaned = normalized.trim();

    let username = if let Some(stripped) = cleaned.strip_prefix('@') {
        stripped
    } else if cleaned.contains("instagram.com/") {
        cleaned
            .split("instagram.com/")
            .nth(1)
            .unwrap_or(cleaned)
            .split(['?', '/'])
            .next()
            .unwrap_or(cleaned)
    } else {
        cleaned
    };

    let username = username.trim();

    if username.is_empty() {
        return Err(InstagramError::InvalidUsername("Username cannot be empty.".into()));
    }

    if !validate_instagram_username(username) {
        return Err(InstagramError::InvalidUsername(format!(
            "'{}' is not a valid Instagram username.",
            username
        )));
    }

    Ok(username.to_string())
}
