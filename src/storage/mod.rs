mod error;
mod memory;

pub use error::StorageError;
pub use memory::MemoryCache;
