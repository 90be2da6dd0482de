//! Catalog types shared by the store sync layer.
//!
//! This crate holds the plain value types that flow between the platform,
//! the capability services and the store context:
//! - `ProductId` and the ordered `ProductIds` set a service is bound to
//! - `Product` descriptors with their `Price` and `ProductKind`
//! - `PurchaseResult` and the `Transaction` a successful purchase carries
//! - `Catalog` for loading product descriptors from JSON

pub mod catalog;
pub mod error;
pub mod ids;
pub mod product;
pub mod purchase;

pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use ids::{ProductId, ProductIds, ProductRepresentable};
pub use product::{Price, Product, ProductKind};
pub use purchase::{PurchaseResult, Transaction, TransactionId};
