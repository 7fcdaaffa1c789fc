#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("No preview URL provided.")]
    MissingUrl,
    #[error("Network error fetching preview: {0}")]
    Network(String),
    #[error("Error processing preview image: {0}")]
    Processing(String),
    #[error("Error processing preview image: body exceeds {0} bytes")]
    TooLarge(usize),
}

impl From<reqwest::Error> for PreviewError {
    fn from(error: reqwest::Error) -> Self {
        PreviewError::Network(error.to_string())
    }
}

impl From<image::ImageError> for PreviewError {
    fn from(error: image::ImageError) -> Self {
        PreviewError::Processing(error.to_string())
    }
}

impl From<std::io::Error> for PreviewError {
    fn from(error: std::io::Error) -> Self {
        PreviewError::Processing(error.to_string())
    }
}
