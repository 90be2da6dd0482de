//! Product fetch service trait, platform-backed and in-memory implementations.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use catalog::{Product, ProductIds};

use crate::error::StoreError;
use crate::platform::StorePlatform;

/// Trait for resolving the product descriptors a service is bound to.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Fetches every bound product the backing store currently offers.
    ///
    /// Unknown identifiers are dropped silently. A failed call returns no
    /// partial results.
    async fn get_products(&self) -> Result<Vec<Product>, StoreError>;
}

/// Product service that resolves descriptors through a platform transport.
#[derive(Debug, Clone)]
pub struct StandardProductService<P> {
    product_ids: ProductIds,
    platform: P,
}

impl<P: StorePlatform> StandardProductService<P> {
    /// Creates a service for the given identifier set.
    pub fn new(product_ids: ProductIds, platform: P) -> Self {
        Self {
            product_ids,
            platform,
        }
    }

    pub fn product_ids(&self) -> &ProductIds {
        &self.product_ids
    }
}

#[async_trait]
impl<P: StorePlatform> ProductService for StandardProductService<P> {
    async fn get_products(&self) -> Result<Vec<Product>, StoreError> {
        let mut products = self
            .platform
            .products(&self.product_ids)
            .await
            .map_err(|e| StoreError::FetchFailed(e.to_string()))?;

        // Platforms answer in their own order and may echo extra entries.
        products.retain(|p| self.product_ids.contains(p.id()));
        products.sort_by_key(|p| self.product_ids.position(p.id()));

        tracing::debug!(
            requested = self.product_ids.len(),
            resolved = products.len(),
            "products fetched"
        );

        Ok(products)
    }
}

#[derive(Debug, Default)]
struct InMemoryProductState {
    products: Vec<Product>,
    fetch_count: u32,
    fail_on_fetch: bool,
    hang_on_fetch: bool,
}

/// In-memory product service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductService {
    state: Arc<RwLock<InMemoryProductState>>,
}

impl InMemoryProductService {
    /// Creates a service that returns the given products, unchanged.
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryProductState {
                products,
                ..InMemoryProductState::default()
            })),
        }
    }

    /// Replaces the products returned by subsequent fetches.
    pub fn set_products(&self, products: Vec<Product>) {
        self.state.write().unwrap().products = products;
    }

    /// Configures the service to fail on fetch calls.
    pub fn set_fail_on_fetch(&self, fail: bool) {
        self.state.write().unwrap().fail_on_fetch = fail;
    }

    /// Configures fetch calls to never complete.
    pub fn set_hang_on_fetch(&self, hang: bool) {
        self.state.write().unwrap().hang_on_fetch = hang;
    }

    /// Returns the number of fetch calls received.
    pub fn fetch_count(&self) -> u32 {
        self.state.read().unwrap().fetch_count
    }
}

#[async_trait]
impl ProductService for InMemoryProductService {
    async fn get_products(&self) -> Result<Vec<Product>, StoreError> {
        let (result, hang) = {
            let mut state = self.state.write().unwrap();
            state.fetch_count += 1;

            let result = if state.fail_on_fetch {
                Err(StoreError::FetchFailed("Network unreachable".to_string()))
            } else {
                Ok(state.products.clone())
            };
            (result, state.hang_on_fetch)
        };

        if hang {
            std::future::pending::<()>().await;
        }

        result
    }
}
