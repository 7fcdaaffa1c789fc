use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    config::ConfigError,
    platform::InstagramError,
    service::{session::SessionError, ServiceError},
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform error: {0}")]
    Platform(#[from] InstagramError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SessionError> for AppError {
    fn from(error: SessionError) -> Self {
        AppError::Service(ServiceError::Session(error))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request failed: {:?}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
