//! Runner error types.

use catalog::CatalogError;
use store_sync::StoreError;
use thiserror::Error;

/// Errors that end a runner invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// The catalog or identifier set could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The product to purchase is not in the synced store context.
    #[error("Product not available for purchase: {0}")]
    UnknownProduct(String),

    /// The report could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
