//! Store error types.

use catalog::CatalogError;
use thiserror::Error;

/// Errors surfaced by the store services.
///
/// Expected purchase outcomes (cancellation, pending approval, a declined
/// payment) are `PurchaseResult` variants, not errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The product fetch could not complete. No partial results are returned.
    #[error("Product fetch failed: {0}")]
    FetchFailed(String),

    /// The platform restore call failed.
    #[error("Restore purchases failed: {0}")]
    RestoreFailed(String),

    /// The purchase request never reached an outcome.
    #[error("Purchase failed: {0}")]
    PurchaseFailed(String),

    /// The configured identifier set is invalid.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
