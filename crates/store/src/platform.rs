//! Boundary to the platform purchase transport.
//!
//! The transport itself (payment backend, receipts, system purchase UI) is
//! owned by the platform. The standard services only need the three calls
//! below.

use async_trait::async_trait;
use catalog::{Product, ProductId, PurchaseResult};
use thiserror::Error;

/// Errors reported by a platform transport.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The platform could not be reached or refused to answer.
    #[error("Platform unavailable: {0}")]
    Unavailable(String),

    /// The platform does not know the product being purchased.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),
}

/// Trait for the platform in-app purchase transport.
#[async_trait]
pub trait StorePlatform: Send + Sync {
    /// Resolves descriptors for the given identifiers.
    ///
    /// Identifiers the platform does not recognize are left out.
    async fn products(&self, ids: &[ProductId]) -> Result<Vec<Product>, PlatformError>;

    /// Presents and executes a purchase for the product.
    async fn purchase(&self, product: &Product) -> Result<PurchaseResult, PlatformError>;

    /// Re-synchronizes prior purchases with the platform account.
    async fn sync(&self) -> Result<(), PlatformError>;
}
