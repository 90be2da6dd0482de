//! Store service that keeps products and purchases in sync with a context.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use async_trait::async_trait;
use catalog::{Product, ProductIds, ProductRepresentable, PurchaseResult};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::context::StoreContext;
use crate::error::StoreError;
use crate::platform::StorePlatform;
use crate::services::product::{ProductService, StandardProductService};
use crate::services::purchase::{PurchaseService, StandardPurchaseService};
use crate::state::{SyncOutcome, SyncState};

/// Trait for services that can sync product and purchase information.
#[async_trait]
pub trait StoreSyncService: Send + Sync {
    /// Refreshes products into the store context, then restores purchases.
    async fn sync_store_data(&self) -> Result<(), StoreError>;
}

/// The full store surface: fetch, purchase, restore and sync.
pub trait StoreService: ProductService + PurchaseService + StoreSyncService {}

impl<T> StoreService for T where T: ProductService + PurchaseService + StoreSyncService {}

/// Composes a product service and a purchase service around a shared
/// [`StoreContext`].
///
/// This is the only writer of the context. Fetch, purchase and restore
/// calls are passed straight through; `sync_store_data` runs the ordered
/// fetch → context update → restore sequence.
///
/// Independent calls are not serialized. Two overlapping syncs may
/// interleave, and callers that purchase while syncing must coordinate
/// themselves.
pub struct StandardStoreService<F, P>
where
    F: ProductService,
    P: PurchaseService,
{
    product_ids: ProductIds,
    context: StoreContext,
    product_service: F,
    purchase_service: P,
    sync_state: watch::Sender<SyncState>,
    syncs_in_flight: AtomicUsize,
}

impl<F, P> StandardStoreService<F, P>
where
    F: ProductService,
    P: PurchaseService,
{
    /// Creates a store service from injected product and purchase services.
    pub fn new(
        product_ids: ProductIds,
        context: StoreContext,
        product_service: F,
        purchase_service: P,
    ) -> Self {
        let (sync_state, _) = watch::channel(SyncState::Idle);
        Self {
            product_ids,
            context,
            product_service,
            purchase_service,
            sync_state,
            syncs_in_flight: AtomicUsize::new(0),
        }
    }

    /// Creates a store service whose identifier set is derived from
    /// product-representable values.
    pub fn from_products<R: ProductRepresentable>(
        products: &[R],
        context: StoreContext,
        product_service: F,
        purchase_service: P,
    ) -> Result<Self, StoreError> {
        let product_ids = ProductIds::from_representables(products)?;
        Ok(Self::new(
            product_ids,
            context,
            product_service,
            purchase_service,
        ))
    }

    /// Returns the identifier set this service was created for.
    pub fn product_ids(&self) -> &ProductIds {
        &self.product_ids
    }

    /// Returns a read handle to the shared store context.
    pub fn context(&self) -> &StoreContext {
        &self.context
    }

    /// Returns the latest sync state transition.
    ///
    /// With overlapping syncs this is the last transition made by any of
    /// them. The state only returns to `Idle` once every running sync has
    /// ended.
    pub fn sync_state(&self) -> SyncState {
        *self.sync_state.borrow()
    }

    /// Subscribes to sync state transitions.
    pub fn subscribe_sync_state(&self) -> watch::Receiver<SyncState> {
        self.sync_state.subscribe()
    }

    /// Runs the sync sequence, stopping at the next suspend point once
    /// `cancel` fires.
    ///
    /// Cancellation is not an error. If it happens after the context write,
    /// the context keeps the fresh products and the outcome reports the
    /// `Restoring` stage.
    #[tracing::instrument(skip(self, cancel), fields(product_count = self.product_ids.len()))]
    pub async fn sync_store_data_cancellable(
        &self,
        cancel: &CancellationToken,
    ) -> Result<SyncOutcome, StoreError> {
        metrics::counter!("store_sync_total").increment(1);
        let sync_start = Instant::now();
        let _idle_on_exit = self.enter_sync();

        // 1. Fetch products
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(cancelled(SyncState::Fetching, sync_start)),
            fetched = self.product_service.get_products() => fetched,
        };
        let products = match fetched {
            Ok(products) => products,
            Err(e) => {
                record_duration(sync_start);
                metrics::counter!("store_sync_failed", "stage" => "fetch").increment(1);
                tracing::warn!(error = %e, "product fetch failed, store context left untouched");
                return Err(e);
            }
        };

        // 2. Replace the context products
        let product_count = products.len();
        self.context.set_products(products);
        self.sync_state.send_replace(SyncState::ContextUpdated);
        tracing::info!(product_count, "store context updated");

        // 3. Restore purchases
        self.sync_state.send_replace(SyncState::Restoring);
        let restored = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(cancelled(SyncState::Restoring, sync_start)),
            restored = self.purchase_service.restore_purchases() => restored,
        };
        if let Err(e) = restored {
            record_duration(sync_start);
            metrics::counter!("store_sync_failed", "stage" => "restore").increment(1);
            tracing::warn!(error = %e, "restore failed after store context was updated");
            return Err(e);
        }

        let duration = record_duration(sync_start);
        metrics::counter!("store_sync_completed").increment(1);
        tracing::info!(duration, "store sync completed");

        Ok(SyncOutcome::Completed)
    }

    /// Registers a running sync and moves the state to `Fetching`.
    ///
    /// The counter is only touched while the watch value is locked, so a
    /// sync starting concurrently cannot be overwritten by a stale `Idle`.
    fn enter_sync(&self) -> IdleOnExit<'_> {
        self.sync_state.send_modify(|state| {
            self.syncs_in_flight.fetch_add(1, Ordering::AcqRel);
            *state = SyncState::Fetching;
        });
        IdleOnExit {
            state: &self.sync_state,
            in_flight: &self.syncs_in_flight,
        }
    }
}

impl<Pl> StandardStoreService<StandardProductService<Pl>, StandardPurchaseService<Pl>>
where
    Pl: StorePlatform + Clone,
{
    /// Creates a store service with the standard product and purchase
    /// services, both bound to `product_ids` and talking to `platform`.
    pub fn with_platform(product_ids: ProductIds, context: StoreContext, platform: Pl) -> Self {
        let product_service = StandardProductService::new(product_ids.clone(), platform.clone());
        let purchase_service =
            StandardPurchaseService::new(product_ids.clone(), context.clone(), platform);
        Self::new(product_ids, context, product_service, purchase_service)
    }
}

impl<F, Pl> StandardStoreService<F, StandardPurchaseService<Pl>>
where
    F: ProductService,
    Pl: StorePlatform,
{
    /// Creates a store service with a custom product service and the
    /// standard purchase service.
    pub fn with_product_service(
        product_ids: ProductIds,
        context: StoreContext,
        product_service: F,
        platform: Pl,
    ) -> Self {
        let purchase_service =
            StandardPurchaseService::new(product_ids.clone(), context.clone(), platform);
        Self::new(product_ids, context, product_service, purchase_service)
    }
}

impl<Pl, P> StandardStoreService<StandardProductService<Pl>, P>
where
    Pl: StorePlatform,
    P: PurchaseService,
{
    /// Creates a store service with the standard product service and a
    /// custom purchase service.
    pub fn with_purchase_service(
        product_ids: ProductIds,
        context: StoreContext,
        purchase_service: P,
        platform: Pl,
    ) -> Self {
        let product_service = StandardProductService::new(product_ids.clone(), platform);
        Self::new(product_ids, context, product_service, purchase_service)
    }
}

#[async_trait]
impl<F, P> ProductService for StandardStoreService<F, P>
where
    F: ProductService,
    P: PurchaseService,
{
    async fn get_products(&self) -> Result<Vec<Product>, StoreError> {
        self.product_service.get_products().await
    }
}

#[async_trait]
impl<F, P> PurchaseService for StandardStoreService<F, P>
where
    F: ProductService,
    P: PurchaseService,
{
    #[tracing::instrument(skip(self, product), fields(product_id = %product.id()))]
    async fn purchase(&self, product: &Product) -> Result<PurchaseResult, StoreError> {
        let result = self.purchase_service.purchase(product).await?;
        tracing::info!(outcome = result.as_str(), "purchase finished");
        Ok(result)
    }

    #[tracing::instrument(skip(self))]
    async fn restore_purchases(&self) -> Result<(), StoreError> {
        self.purchase_service.restore_purchases().await
    }
}

#[async_trait]
impl<F, P> StoreSyncService for StandardStoreService<F, P>
where
    F: ProductService,
    P: PurchaseService,
{
    async fn sync_store_data(&self) -> Result<(), StoreError> {
        self.sync_store_data_cancellable(&CancellationToken::new())
            .await
            .map(|_| ())
    }
}

fn record_duration(sync_start: Instant) -> f64 {
    let duration = sync_start.elapsed().as_secs_f64();
    metrics::histogram!("store_sync_duration_seconds").record(duration);
    duration
}

fn cancelled(stage: SyncState, sync_start: Instant) -> SyncOutcome {
    record_duration(sync_start);
    metrics::counter!("store_sync_cancelled").increment(1);
    tracing::info!(%stage, "store sync cancelled");
    SyncOutcome::Cancelled { stage }
}

/// Returns the sync state to `Idle` once the last running sync ends,
/// including when a sync future is dropped mid-flight.
struct IdleOnExit<'a> {
    state: &'a watch::Sender<SyncState>,
    in_flight: &'a AtomicUsize,
}

impl Drop for IdleOnExit<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|state| {
            if self.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
                *state = SyncState::Idle;
                true
            } else {
                false
            }
        });
    }
}
