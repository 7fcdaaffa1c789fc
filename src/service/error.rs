use super::{download::RelayError, preview::PreviewError, session::SessionError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    #[error("Preview error: {0}")]
    Preview(#[from] PreviewError),
    #[error("Download error: {0}")]
    Relay(#[from] RelayError),
}
