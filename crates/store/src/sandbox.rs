//! In-memory platform that serves a local catalog.

use std::sync::Arc;

use async_trait::async_trait;
use catalog::{Catalog, Product, ProductId, PurchaseResult, Transaction};
use tokio::sync::RwLock;

use crate::platform::{PlatformError, StorePlatform};

/// How the sandbox answers purchase requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PurchaseBehavior {
    /// Every purchase succeeds with a new transaction.
    #[default]
    Approve,
    /// The user dismisses the purchase sheet.
    Cancel,
    /// The purchase waits for approval, e.g. ask-to-buy.
    Defer,
    /// The payment is declined with the given reason.
    Decline(String),
}

#[derive(Debug, Default)]
struct SandboxState {
    catalog: Catalog,
    behavior: PurchaseBehavior,
    transactions: Vec<Transaction>,
    sync_count: u32,
    offline: bool,
}

/// Platform implementation backed by an in-memory catalog.
///
/// Serves the same contract as a real platform transport, which makes it
/// usable for local development without a payment backend.
#[derive(Debug, Clone, Default)]
pub struct SandboxPlatform {
    state: Arc<RwLock<SandboxState>>,
}

impl SandboxPlatform {
    /// Creates a sandbox serving the given catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            state: Arc::new(RwLock::new(SandboxState {
                catalog,
                ..SandboxState::default()
            })),
        }
    }

    /// Simulates losing or regaining connectivity.
    pub async fn set_offline(&self, offline: bool) {
        self.state.write().await.offline = offline;
    }

    /// Sets how subsequent purchases are answered.
    pub async fn set_purchase_behavior(&self, behavior: PurchaseBehavior) {
        self.state.write().await.behavior = behavior;
    }

    /// Replaces the served catalog.
    pub async fn set_catalog(&self, catalog: Catalog) {
        self.state.write().await.catalog = catalog;
    }

    /// Returns every transaction completed so far.
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.state.read().await.transactions.clone()
    }

    /// Returns how many times purchases were synced.
    pub async fn sync_count(&self) -> u32 {
        self.state.read().await.sync_count
    }
}

#[async_trait]
impl StorePlatform for SandboxPlatform {
    async fn products(&self, ids: &[ProductId]) -> Result<Vec<Product>, PlatformError> {
        let state = self.state.read().await;

        if state.offline {
            return Err(PlatformError::Unavailable("sandbox is offline".to_string()));
        }

        let mut products: Vec<Product> = Vec::with_capacity(ids.len());
        for id in ids {
            if products.iter().any(|p| p.id() == id) {
                continue;
            }
            if let Some(product) = state.catalog.get(id) {
                products.push(product.clone());
            }
        }

        Ok(products)
    }

    async fn purchase(&self, product: &Product) -> Result<PurchaseResult, PlatformError> {
        let mut state = self.state.write().await;

        if state.offline {
            return Err(PlatformError::Unavailable("sandbox is offline".to_string()));
        }
        if state.catalog.get(product.id()).is_none() {
            return Err(PlatformError::UnknownProduct(product.id().clone()));
        }

        let behavior = state.behavior.clone();
        let result = match behavior {
            PurchaseBehavior::Approve => {
                let transaction = Transaction::new(product.id().clone());
                state.transactions.push(transaction.clone());
                PurchaseResult::succeeded(transaction)
            }
            PurchaseBehavior::Cancel => PurchaseResult::UserCancelled,
            PurchaseBehavior::Defer => PurchaseResult::Pending,
            PurchaseBehavior::Decline(reason) => PurchaseResult::failed(reason),
        };

        Ok(result)
    }

    async fn sync(&self) -> Result<(), PlatformError> {
        let mut state = self.state.write().await;

        if state.offline {
            return Err(PlatformError::Unavailable("sandbox is offline".to_string()));
        }

        state.sync_count += 1;
        Ok(())
    }
}
