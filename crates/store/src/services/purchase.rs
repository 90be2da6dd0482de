//! Purchase service trait, platform-backed and in-memory implementations.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use catalog::{Product, ProductId, ProductIds, PurchaseResult, Transaction};

use crate::context::StoreContext;
use crate::error::StoreError;
use crate::platform::StorePlatform;

/// Trait for purchase and restore operations.
///
/// Concurrent purchases of different products are fine. Callers must not
/// purchase the same product concurrently; implementations do not deduplicate.
#[async_trait]
pub trait PurchaseService: Send + Sync {
    /// Executes a purchase of a product obtained from a matching fetch.
    async fn purchase(&self, product: &Product) -> Result<PurchaseResult, StoreError>;

    /// Re-resolves prior purchases without requiring a new payment.
    async fn restore_purchases(&self) -> Result<(), StoreError>;
}

/// Purchase service that executes purchases through a platform transport.
#[derive(Debug, Clone)]
pub struct StandardPurchaseService<P> {
    product_ids: ProductIds,
    context: StoreContext,
    platform: P,
}

impl<P: StorePlatform> StandardPurchaseService<P> {
    /// Creates a service bound to an identifier set and a store context.
    pub fn new(product_ids: ProductIds, context: StoreContext, platform: P) -> Self {
        Self {
            product_ids,
            context,
            platform,
        }
    }
}

#[async_trait]
impl<P: StorePlatform> PurchaseService for StandardPurchaseService<P> {
    async fn purchase(&self, product: &Product) -> Result<PurchaseResult, StoreError> {
        if !self.product_ids.contains(product.id()) {
            tracing::warn!(product_id = %product.id(), "purchasing product outside the configured catalog");
        } else if !self.context.contains(product.id()) {
            tracing::warn!(product_id = %product.id(), "purchasing product that is not in the store context");
        }

        let result = self
            .platform
            .purchase(product)
            .await
            .map_err(|e| StoreError::PurchaseFailed(e.to_string()))?;

        metrics::counter!("store_purchases_total", "outcome" => result.as_str()).increment(1);

        Ok(result)
    }

    async fn restore_purchases(&self) -> Result<(), StoreError> {
        self.platform
            .sync()
            .await
            .map_err(|e| StoreError::RestoreFailed(e.to_string()))
    }
}

#[derive(Debug, Default)]
struct InMemoryPurchaseState {
    outcome: Option<PurchaseResult>,
    purchased: Vec<ProductId>,
    restore_count: u32,
    context_at_restore: Vec<Vec<ProductId>>,
    fail_on_purchase: bool,
    fail_on_restore: bool,
    hang_on_restore: bool,
}

/// In-memory purchase service for testing.
///
/// Purchases succeed with a fresh transaction unless another outcome is
/// scripted. When given a context to observe, every restore call records the
/// product identifiers the context held at that moment.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPurchaseService {
    state: Arc<RwLock<InMemoryPurchaseState>>,
    observed: Option<StoreContext>,
}

impl InMemoryPurchaseService {
    /// Creates a new in-memory purchase service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a snapshot of `context` on every restore call.
    pub fn observing(mut self, context: StoreContext) -> Self {
        self.observed = Some(context);
        self
    }

    /// Scripts the result of subsequent purchases.
    pub fn set_outcome(&self, outcome: PurchaseResult) {
        self.state.write().unwrap().outcome = Some(outcome);
    }

    /// Configures the service to fail on purchase calls.
    pub fn set_fail_on_purchase(&self, fail: bool) {
        self.state.write().unwrap().fail_on_purchase = fail;
    }

    /// Configures the service to fail on restore calls.
    pub fn set_fail_on_restore(&self, fail: bool) {
        self.state.write().unwrap().fail_on_restore = fail;
    }

    /// Configures restore calls to never complete.
    pub fn set_hang_on_restore(&self, hang: bool) {
        self.state.write().unwrap().hang_on_restore = hang;
    }

    /// Returns the products purchased so far, in call order.
    pub fn purchased(&self) -> Vec<ProductId> {
        self.state.read().unwrap().purchased.clone()
    }

    /// Returns the number of restore calls received.
    pub fn restore_count(&self) -> u32 {
        self.state.read().unwrap().restore_count
    }

    /// Returns the observed context contents at each restore call.
    pub fn context_at_restore(&self) -> Vec<Vec<ProductId>> {
        self.state.read().unwrap().context_at_restore.clone()
    }
}

#[async_trait]
impl PurchaseService for InMemoryPurchaseService {
    async fn purchase(&self, product: &Product) -> Result<PurchaseResult, StoreError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_purchase {
            return Err(StoreError::PurchaseFailed(
                "Payment sheet unavailable".to_string(),
            ));
        }

        state.purchased.push(product.id().clone());

        Ok(state
            .outcome
            .clone()
            .unwrap_or_else(|| PurchaseResult::succeeded(Transaction::new(product.id().clone()))))
    }

    async fn restore_purchases(&self) -> Result<(), StoreError> {
        let (fail, hang) = {
            let mut state = self.state.write().unwrap();
            state.restore_count += 1;

            if let Some(context) = &self.observed {
                let snapshot = context.products().iter().map(|p| p.id().clone()).collect();
                state.context_at_restore.push(snapshot);
            }
            (state.fail_on_restore, state.hang_on_restore)
        };

        if hang {
            std::future::pending::<()>().await;
        }
        if fail {
            return Err(StoreError::RestoreFailed(
                "Account sync rejected".to_string(),
            ));
        }

        Ok(())
    }
}
