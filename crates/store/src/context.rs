//! Shared, observable store state.

use std::sync::Arc;

use catalog::{Product, ProductId};
use tokio::sync::watch;

/// Latest known product collection, shared between the store service and
/// any number of observers.
///
/// Cloning yields another handle to the same state. Reads and subscriptions
/// are public; writes are reserved to the store service inside this crate.
/// Each write publishes a whole new collection in one step, so an observer
/// sees either the previous collection or the next one, never a mix.
#[derive(Debug, Clone)]
pub struct StoreContext {
    products: Arc<watch::Sender<Arc<[Product]>>>,
}

impl StoreContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::with_products(Vec::new())
    }

    /// Creates a context seeded with an initial product collection.
    pub fn with_products(products: Vec<Product>) -> Self {
        let (tx, _rx) = watch::channel(Arc::<[Product]>::from(products));
        Self {
            products: Arc::new(tx),
        }
    }

    /// Returns the current product collection.
    pub fn products(&self) -> Arc<[Product]> {
        Arc::clone(&self.products.borrow())
    }

    /// Looks up a product in the current collection.
    pub fn product(&self, id: &ProductId) -> Option<Product> {
        self.products.borrow().iter().find(|p| p.id() == id).cloned()
    }

    /// Returns true if the current collection holds the given product.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.products.borrow().iter().any(|p| p.id() == id)
    }

    pub fn len(&self) -> usize {
        self.products.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.borrow().is_empty()
    }

    /// Subscribes to product collection changes.
    ///
    /// The receiver starts out with the current value marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<Arc<[Product]>> {
        self.products.subscribe()
    }

    /// Replaces the whole product collection and notifies observers.
    pub(crate) fn set_products(&self, products: Vec<Product>) {
        self.products.send_replace(products.into());
    }
}

impl Default for StoreContext {
    fn default() -> Self {
        Self::new()
    }
}
