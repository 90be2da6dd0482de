//! Store sync layer over a platform in-app purchase API.
//!
//! This crate composes two independent capabilities into one observable
//! store state:
//! - a [`ProductService`] that resolves product descriptors
//! - a [`PurchaseService`] that executes purchases and restores
//!
//! [`StandardStoreService`] owns writes to the shared [`StoreContext`] and
//! runs the sync sequence:
//! 1. Fetch products (on failure nothing else happens)
//! 2. Replace the products held by the context
//! 3. Restore purchases (on failure the fresh products are kept)

pub mod context;
pub mod error;
pub mod platform;
pub mod sandbox;
pub mod services;
pub mod state;
pub mod store_service;

pub use context::StoreContext;
pub use error::{Result, StoreError};
pub use platform::{PlatformError, StorePlatform};
pub use sandbox::{PurchaseBehavior, SandboxPlatform};
pub use services::{
    InMemoryProductService, InMemoryPurchaseService, ProductService, PurchaseService,
    StandardProductService, StandardPurchaseService,
};
pub use state::{SyncOutcome, SyncState};
pub use store_service::{StandardStoreService, StoreService, StoreSyncService};
pub use tokio_util::sync::CancellationToken;
