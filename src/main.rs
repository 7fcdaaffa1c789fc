use config::{build_config, AppConfig};
use error::AppResult;
use state::AppState;

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

mod config;
mod error;
mod handler;
mod platform;
mod service;
mod state;
mod storage;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> AppResult<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    let _ = pretty_env_logger::try_init_timed();

    info!("Starting gramsnap...");

    AppConfig::set_global(build_config()?)?;
    let config = AppConfig::get()?;

    if config.session.uses_fallback_secret() {
        warn!("Using the default local SECRET_KEY! Set SECRET_KEY before exposing this server.");
    }

    info!("Initializing AppState...");
    let state = AppState::new(config)?;

    let app = handler::router(state);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Listening on http://{}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
