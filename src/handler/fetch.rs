use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{
    error::AppResult,
    service::{
        fetch::{FetchError, FetchTarget},
        session::SessionRecord,
    },
    state::AppState,
};

use super::view;

#[derive(Debug, Default, Deserialize)]
pub struct FetchForm {
    pub fetch_type: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
}

/// Runs a fetch and renders the results, or redirects home with a flash message.
pub async fn fetch(State(state): State<AppState>, jar: CookieJar, Form(form): Form<FetchForm>) -> AppResult<Response> {
    let services = &state.service_registry;
    let (jar, token) = services.session.resolve(jar)?;

    let result = match FetchTarget::from_form(
        form.fetch_type.as_deref(),
        form.url.as_deref(),
        form.username.as_deref(),
    ) {
        Ok(target) => services.fetch.fetch(&target).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(outcome) => {
            let record = SessionRecord::from(&outcome);
            info!("Stored {} item(s) under {}", record.items.len(), record.key());
            services.session.put_record(&token, record);

            Ok((jar, Html(view::render_results(&outcome))).into_response())
        }
        Err(e) => {
            match &e {
                FetchError::Internal(inner) => error!("Unexpected fetch error: {:?}", inner),
                FetchError::NoStories(_) => info!("{}", e),
                _ => warn!("Error during fetch: {}", e),
            }
            services.session.push_flash(&token, e.flash());

            Ok((jar, Redirect::to("/")).into_response())
        }
    }
}
