use std::path::Path;

use percent_encoding::percent_decode_str;
use rand::Rng;
use url::Url;

const KNOWN_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "mp4", "mov"];

/// Picks the file extension for a download.
///
/// The media type decides the default; a recognised extension on the URL path
/// wins, with still-image formats folded into `.jpg`.
pub fn resolve_extension(media_url: &str, is_video: bool) -> &'static str {
    let default = if is_video { ".mp4" } else { ".jpg" };

    let Some(ext) = url_extension(media_url) else {
        return default;
    };

    match ext.as_str() {
        "jpg" | "jpeg" | "png" | "webp" => ".jpg",
        "mp4" => ".mp4",
        "mov" => ".mov",
        _ => default,
    }
}

fn url_extension(media_url: &str) -> Option<String> {
    let path = match Url::parse(media_url) {
        Ok(url) => percent_decode_str(url.path()).decode_utf8_lossy().into_owned(),
        Err(_) => media_url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    let ext = Path::new(&path).extension()?.to_str()?.to_lowercase();

    KNOWN_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

fn random_suffix() -> String {
    let n: u16 = rand::thread_rng().gen_range(1..=9999);
    format!("{:04}", n)
}

pub fn sanitize_username(username: &str) -> String {
    username
        .chars()
        .filter(|c| !matches!(c, '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|'))
        .collect()
}

/// `1234.jpg` style name for a post item.
pub fn post_filename(media_url: &str, is_video: bool) -> String {
    format!("{}{}", random_suffix(), resolve_extension(media_url, is_video))
}

/// `<username>_story_<NN>_<RRRR>.<ext>`, with `index` counted from zero.
pub fn story_filename(username: &str, index: usize, media_url: &str, is_video: bool) -> String {
    format!(
        "{}_story_{:02}_{}{}",
        sanitize_username(username),
        index + 1,
        random_suffix(),
        resolve_extension(media_url, is_video)
    )
}
