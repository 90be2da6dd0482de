//! Capability service traits with platform-backed and in-memory implementations.

pub mod product;
pub mod purchase;

pub use product::{InMemoryProductService, ProductService, StandardProductService};
pub use purchase::{InMemoryPurchaseService, PurchaseService, StandardPurchaseService};
