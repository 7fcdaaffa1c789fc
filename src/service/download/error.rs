use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::platform::MediaKind;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{}", expired_message(.0))]
    SessionExpired(MediaKind),
    #[error("{}", invalid_item_message(.0))]
    InvalidItem(MediaKind),
    #[error("Error: Request timed out.")]
    Timeout,
    #[error("Error: Failed to retrieve {} (Status: {}).", file_noun(.kind), status_label(.status))]
    Upstream {
        kind: MediaKind,
        status: Option<StatusCode>,
    },
    #[error("Error: Server failed to prepare download.")]
    Internal(String),
}

fn expired_message(kind: &MediaKind) -> &'static str {
    match kind {
        MediaKind::Post => "Error: Download session expired. Please fetch the post info again.",
        MediaKind::Story => "Error: Story download session expired. Please fetch the username again.",
    }
}

fn invalid_item_message(kind: &MediaKind) -> &'static str {
    match kind {
        MediaKind::Post => "Error: Invalid item requested.",
        MediaKind::Story => "Error: Invalid story item requested.",
    }
}

fn file_noun(kind: &MediaKind) -> &'static str {
    match kind {
        MediaKind::Post => "file",
        MediaKind::Story => "story file",
    }
}

fn status_label(status: &Option<StatusCode>) -> String {
    status
        .map(|s| s.as_u16().to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

impl RelayError {
    pub fn from_transport(kind: MediaKind, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            RelayError::Timeout
        } else {
            RelayError::Upstream {
                kind,
                status: error.status(),
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::SessionExpired(_) | RelayError::InvalidItem(_) => StatusCode::NOT_FOUND,
            RelayError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Upstream {
                status: Some(status), ..
            } => *status,
            RelayError::Upstream { status: None, .. } | RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            RelayError::Internal(detail) => error!("Download failed: {}", detail),
            e => warn!("Download refused: {}", e),
        }
        (self.status(), self.to_string()).into_response()
    }
}
