mod download;
mod fetch;
mod index;
pub mod view;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index))
        .route("/fetch", post(fetch::fetch))
        .route("/download_item/{shortcode}/{item_index}", get(download::download_item))
        .route(
            "/download_story_item/{username}/{item_index}",
            get(download::download_story_item),
        )
        .with_state(state)
}
