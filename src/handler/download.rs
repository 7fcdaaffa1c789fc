use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::{error::AppError, platform::MediaKind, state::AppState};

pub async fn download_item(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((shortcode, item_index)): Path<(String, String)>,
) -> Response {
    relay(state, jar, MediaKind::Post, &shortcode, &item_index).await
}

pub async fn download_story_item(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((username, item_index)): Path<(String, String)>,
) -> Response {
    relay(state, jar, MediaKind::Story, &username, &item_index).await
}

async fn relay(state: AppState, jar: CookieJar, kind: MediaKind, identifier: &str, item_index: &str) -> Response {
    let Some(index) = parse_index(item_index) else {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    };

    let services = &state.service_registry;
    let (jar, token) = match services.session.resolve(jar) {
        Ok(resolved) => resolved,
        Err(e) => return AppError::from(e).into_response(),
    };

    match services.download.relay(&token, kind, identifier, index).await {
        Ok(response) => (jar, response).into_response(),
        Err(e) => (jar, e).into_response(),
    }
}

/// Only plain non-negative integers name an item; `-1` and `+1` do not.
fn parse_index(raw: &str) -> Option<usize> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
