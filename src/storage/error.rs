#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Memory error: {0}")]
    Memory(String),
}
