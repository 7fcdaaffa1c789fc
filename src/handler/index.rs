use axum::{extract::State, response::Html};
use axum_extra::extract::CookieJar;

use crate::{error::AppResult, state::AppState};

use super::view;

pub async fn index(State(state): State<AppState>, jar: CookieJar) -> AppResult<(CookieJar, Html<String>)> {
    let sessions = &state.service_registry.session;
    let (jar, token) = sessions.resolve(jar)?;

    let flashes = sessions.take_flashes(&token);

    Ok((jar, Html(view::render_index(&flashes))))
}
