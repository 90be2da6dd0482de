//! Catalog error types.

use thiserror::Error;

/// Errors that can occur while building identifier sets or loading catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A product identifier was empty.
    #[error("Product identifier at position {position} is empty")]
    EmptyProductId { position: usize },

    /// A catalog file could not be read.
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// A catalog document could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for catalog results.
pub type Result<T> = std::result::Result<T, CatalogError>;
