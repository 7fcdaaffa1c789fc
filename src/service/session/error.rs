#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("Session signing error: {0}")]
    Signing(String),
    #[error("Cache error: {0}")]
    CacheError(String),
}
