//! Error taxonomy shared by the store, the vector index and the catalog.

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("A resource with link '{0}' already exists")]
    DuplicateLink(String),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("No matching search result found for deletion.")]
    NoMatchingSession,
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),
    #[error("Index persistence failed: {0}")]
    IndexPersistenceError(String),
    #[error("Different dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
