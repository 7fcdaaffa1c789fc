#[derive(Debug, thiserror::Error)]
pub enum InstagramError {
    #[error("Instagram profile '{0}' not found.")]
    ProfileNotFound(String),
    #[error("Cannot access profile/post '{0}'. Profile is private.")]
    PrivateProfile(String),
    #[error("Login required to access '{0}'.")]
    LoginRequired(String),
    #[error("Post '{0}' not found.")]
    PostNotFound(String),
    #[error("Query returned not found: {0}")]
    QueryReturnedNotFound(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Too many requests: {0}")]
    TooManyRequests(String),
    #[error("Instagram error: {0}")]
    Upstream(String),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Invalid username: {0}")]
    InvalidUsername(String),
}

impl InstagramError {
    /// Maps transport failures onto the connection/network split the handlers report.
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            InstagramError::Connection(error.to_string())
        } else {
            InstagramError::NetworkError(error)
        }
    }
}
