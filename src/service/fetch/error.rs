use crate::{
    platform::InstagramError,
    service::session::{Flash, FlashLevel},
};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid Instagram Post/Reel URL format.")]
    InvalidUrl,
    #[error("Username cannot be empty.")]
    EmptyUsername,
    #[error("{0}")]
    InvalidUsername(String),
    #[error("Invalid fetch type specified.")]
    InvalidFetchType,
    #[error("No active public stories found for user '{0}'.")]
    NoStories(String),
    #[error("Could not find any downloadable items.")]
    NoDownloadableItems,
    #[error("Error: Instagram profile '{0}' not found.")]
    ProfileNotFound(String),
    #[error("Error: Cannot access profile/post '{0}'. Profile is private.")]
    PrivateProfile(String),
    #[error("Network Error during fetch: {0}")]
    Network(InstagramError),
    #[error("Instagram error: {0}")]
    Instagram(InstagramError),
    #[error("An unexpected server error occurred during fetch.")]
    Internal(#[from] anyhow::Error),
}

impl FetchError {
    /// Attaches the identifier of the branch that failed: shortcode or username.
    pub fn from_instagram(target: &str, error: InstagramError) -> Self {
        match error {
            InstagramError::ProfileNotFound(_) => FetchError::ProfileNotFound(target.to_string()),
            InstagramError::PrivateProfile(_) => FetchError::PrivateProfile(target.to_string()),
            InstagramError::InvalidUsername(message) => FetchError::InvalidUsername(message),
            e @ (InstagramError::NetworkError(_) | InstagramError::Connection(_)) => FetchError::Network(e),
            e => FetchError::Instagram(e),
        }
    }

    pub fn level(&self) -> FlashLevel {
        match self {
            FetchError::NoStories(_) => FlashLevel::Info,
            _ => FlashLevel::Error,
        }
    }

    pub fn flash(&self) -> Flash {
        match self.level() {
            FlashLevel::Info => Flash::info(self.to_string()),
            FlashLevel::Error => Flash::error(self.to_string()),
        }
    }
}
