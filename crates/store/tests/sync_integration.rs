//! Integration tests for the store sync sequence.

use catalog::{Catalog, Price, Product, ProductId, ProductIds, ProductKind, PurchaseResult};
use store_sync::{
    InMemoryProductService, InMemoryPurchaseService, ProductService, PurchaseBehavior,
    PurchaseService, SandboxPlatform, StandardStoreService, StoreContext, StoreError,
    StoreService, StoreSyncService, SyncState,
};

type TestStoreService = StandardStoreService<InMemoryProductService, InMemoryPurchaseService>;

struct TestHarness {
    service: TestStoreService,
    context: StoreContext,
    products: InMemoryProductService,
    purchases: InMemoryPurchaseService,
}

impl TestHarness {
    fn new(ids: &[&str], returned: Vec<Product>) -> Self {
        let context = StoreContext::new();
        let products = InMemoryProductService::new(returned);
        let purchases = InMemoryPurchaseService::new().observing(context.clone());

        let service = StandardStoreService::new(
            ProductIds::new(ids.iter().copied()).unwrap(),
            context.clone(),
            products.clone(),
            purchases.clone(),
        );

        Self {
            service,
            context,
            products,
            purchases,
        }
    }

    fn context_ids(&self) -> Vec<String> {
        self.context
            .products()
            .iter()
            .map(|p| p.id().to_string())
            .collect()
    }
}

fn subscription(id: &str, name: &str, cents: i64) -> Product {
    Product::new(id, name, Price::new(cents, "USD"), ProductKind::AutoRenewable)
}

fn pro_products() -> Vec<Product> {
    vec![
        subscription("pro_monthly", "Pro Monthly", 499),
        subscription("pro_yearly", "Pro Yearly", 3999),
    ]
}

#[tokio::test]
async fn test_pro_subscriptions_sync() {
    let h = TestHarness::new(&["pro_monthly", "pro_yearly"], pro_products());

    h.service.sync_store_data().await.unwrap();

    assert_eq!(h.context_ids(), ["pro_monthly", "pro_yearly"]);
    assert_eq!(&*h.context.products(), pro_products().as_slice());
    assert_eq!(h.products.fetch_count(), 1);
    assert_eq!(h.purchases.restore_count(), 1);
}

#[tokio::test]
async fn test_fetch_failure_leaves_initial_context_and_skips_restore() {
    let h = TestHarness::new(&["pro_monthly", "pro_yearly"], pro_products());
    h.products.set_fail_on_fetch(true);

    let result = h.service.sync_store_data().await;

    assert!(matches!(result, Err(StoreError::FetchFailed(_))));
    assert!(h.context.is_empty());
    assert_eq!(h.purchases.restore_count(), 0);
}

#[tokio::test]
async fn test_context_write_happens_before_restore() {
    let h = TestHarness::new(&["pro_monthly", "pro_yearly"], pro_products());

    h.service.sync_store_data().await.unwrap();

    let seen = h.purchases.context_at_restore();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0],
        vec![ProductId::new("pro_monthly"), ProductId::new("pro_yearly")]
    );
}

#[tokio::test]
async fn test_restore_failure_surfaces_with_fresh_products() {
    let h = TestHarness::new(&["pro_monthly", "pro_yearly"], pro_products());
    h.purchases.set_fail_on_restore(true);

    let result = h.service.sync_store_data().await;

    assert!(matches!(result, Err(StoreError::RestoreFailed(_))));
    assert_eq!(h.context_ids(), ["pro_monthly", "pro_yearly"]);
    assert_eq!(h.service.sync_state(), SyncState::Idle);
}

#[tokio::test]
async fn test_retry_after_restore_failure_completes() {
    let h = TestHarness::new(&["pro_monthly", "pro_yearly"], pro_products());
    h.purchases.set_fail_on_restore(true);
    assert!(h.service.sync_store_data().await.is_err());

    h.purchases.set_fail_on_restore(false);
    h.service.sync_store_data().await.unwrap();

    assert_eq!(h.context_ids(), ["pro_monthly", "pro_yearly"]);
    assert_eq!(h.purchases.restore_count(), 2);
}

#[tokio::test]
async fn test_sync_is_idempotent_for_stable_products() {
    let h = TestHarness::new(&["pro_monthly", "pro_yearly"], pro_products());

    h.service.sync_store_data().await.unwrap();
    let after_first = h.context.products();
    h.service.sync_store_data().await.unwrap();
    let after_second = h.context.products();

    assert_eq!(&*after_first, &*after_second);
}

#[tokio::test]
async fn test_get_products_returns_fetch_result_unfiltered() {
    // The orchestrator does not filter on its own identifier set.
    let mut returned = pro_products();
    returned.push(subscription("legacy", "Legacy", 199));
    let h = TestHarness::new(&["pro_monthly"], returned.clone());

    let products = h.service.get_products().await.unwrap();

    assert_eq!(products, returned);
    assert!(h.context.is_empty());
}

#[tokio::test]
async fn test_observers_see_each_sync() {
    let h = TestHarness::new(&["pro_monthly", "pro_yearly"], pro_products());
    let mut rx = h.context.subscribe();

    h.service.sync_store_data().await.unwrap();

    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().len(), 2);
}

#[tokio::test]
async fn test_purchase_result_is_not_mirrored_into_context() {
    let h = TestHarness::new(&["pro_monthly", "pro_yearly"], pro_products());
    h.service.sync_store_data().await.unwrap();
    let before = h.context.products();

    h.purchases.set_outcome(PurchaseResult::UserCancelled);
    let result = h.service.purchase(&pro_products()[0]).await.unwrap();

    assert_eq!(result, PurchaseResult::UserCancelled);
    assert_eq!(&*h.context.products(), &*before);
}

async fn run_through_trait_object(service: &dyn StoreService) -> Result<Vec<Product>, StoreError> {
    service.sync_store_data().await?;
    service.restore_purchases().await?;
    service.get_products().await
}

#[tokio::test]
async fn test_usable_as_store_service_trait_object() {
    let h = TestHarness::new(&["pro_monthly", "pro_yearly"], pro_products());

    let products = run_through_trait_object(&h.service).await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(h.purchases.restore_count(), 2);
}

#[tokio::test]
async fn test_standard_services_against_sandbox() {
    let platform = SandboxPlatform::new(Catalog::demo());
    let context = StoreContext::new();
    let ids = ProductIds::new(["pro_yearly", "retired_plan", "pro_monthly"]).unwrap();
    let service = StandardStoreService::with_platform(ids, context.clone(), platform.clone());

    service.sync_store_data().await.unwrap();

    let names: Vec<String> = context.products().iter().map(|p| p.id().to_string()).collect();
    assert_eq!(names, ["pro_yearly", "pro_monthly"]);
    assert_eq!(platform.sync_count().await, 1);

    let product = context.product(&ProductId::new("pro_yearly")).unwrap();
    let result = service.purchase(&product).await.unwrap();
    assert!(result.is_success());
    assert_eq!(platform.transactions().await.len(), 1);

    platform.set_purchase_behavior(PurchaseBehavior::Defer).await;
    let result = service.purchase(&product).await.unwrap();
    assert_eq!(result, PurchaseResult::Pending);
}

#[tokio::test]
async fn test_catalog_change_replaces_context_through_standard_services() {
    let platform = SandboxPlatform::new(Catalog::demo());
    let context = StoreContext::new();
    let ids = ProductIds::new(["pro_monthly", "pro_yearly", "lifetime"]).unwrap();
    let service = StandardStoreService::with_platform(ids, context.clone(), platform.clone());
    service.sync_store_data().await.unwrap();
    assert_eq!(context.len(), 3);

    platform
        .set_catalog(Catalog::new(vec![subscription(
            "pro_yearly",
            "Pro Yearly",
            2999,
        )]))
        .await;
    service.sync_store_data().await.unwrap();

    let names: Vec<String> = context.products().iter().map(|p| p.id().to_string()).collect();
    assert_eq!(names, ["pro_yearly"]);
    assert_eq!(context.products()[0].price().minor_units(), 2999);
    assert_eq!(platform.sync_count().await, 2);
}

#[tokio::test]
async fn test_sandbox_offline_after_first_sync_keeps_products() {
    let platform = SandboxPlatform::new(Catalog::demo());
    let context = StoreContext::new();
    let ids = Catalog::demo().product_ids().unwrap();
    let service = StandardStoreService::with_platform(ids, context.clone(), platform.clone());
    service.sync_store_data().await.unwrap();

    platform.set_offline(true).await;
    let result = service.sync_store_data().await;

    assert!(matches!(result, Err(StoreError::FetchFailed(_))));
    assert_eq!(context.len(), 4);
    assert_eq!(platform.sync_count().await, 1);
}

#[tokio::test]
async fn test_custom_purchase_service_with_standard_products() {
    let platform = SandboxPlatform::new(Catalog::demo());
    let context = StoreContext::new();
    let purchases = InMemoryPurchaseService::new().observing(context.clone());
    purchases.set_fail_on_restore(true);
    let ids = ProductIds::new(["lifetime"]).unwrap();
    let service = StandardStoreService::with_purchase_service(
        ids,
        context.clone(),
        purchases.clone(),
        platform,
    );

    let result = service.sync_store_data().await;

    assert!(matches!(result, Err(StoreError::RestoreFailed(_))));
    assert_eq!(context.len(), 1);
    assert_eq!(
        purchases.context_at_restore(),
        vec![vec![ProductId::new("lifetime")]]
    );
}

#[tokio::test]
async fn test_custom_product_service_with_standard_purchases() {
    let platform = SandboxPlatform::new(Catalog::demo());
    let context = StoreContext::new();
    let ids = ProductIds::new(["pro_monthly", "pro_yearly"]).unwrap();
    let service = StandardStoreService::with_product_service(
        ids,
        context.clone(),
        InMemoryProductService::new(pro_products()),
        platform.clone(),
    );

    service.sync_store_data().await.unwrap();

    assert_eq!(context.len(), 2);
    assert_eq!(platform.sync_count().await, 1);
}

#[tokio::test]
async fn test_empty_identifier_set_rejected_by_from_products() {
    let result = StandardStoreService::from_products(
        &["pro_monthly", ""],
        StoreContext::new(),
        InMemoryProductService::default(),
        InMemoryPurchaseService::new(),
    );

    assert!(matches!(result, Err(StoreError::Catalog(_))));
}
