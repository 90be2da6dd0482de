//! Runner that syncs a store catalog against the sandbox platform.
//!
//! Loads a catalog, builds a [`StandardStoreService`] with the standard
//! services, runs one sync and optionally a purchase, and reports what the
//! store context ended up holding.

pub mod config;
pub mod error;

use catalog::{Catalog, Product, ProductId, ProductIds, PurchaseResult};
use serde::Serialize;
use store_sync::{
    PurchaseService, SandboxPlatform, StandardStoreService, StoreContext, StoreSyncService,
};

use config::Config;
use error::CliError;

/// What a run left behind.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Products held by the store context after the sync.
    pub products: Vec<Product>,
    /// Outcome of the requested purchase, if one was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase: Option<PurchaseResult>,
}

impl RunReport {
    /// Renders the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Loads the configured catalog, or the built-in demo catalog.
pub fn load_catalog(config: &Config) -> Result<Catalog, CliError> {
    match &config.catalog_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading catalog");
            Ok(Catalog::from_path(path)?)
        }
        None => Ok(Catalog::demo()),
    }
}

/// Runs one sync, then the configured purchase.
#[tracing::instrument(skip(config))]
pub async fn run(config: &Config) -> Result<RunReport, CliError> {
    let catalog = load_catalog(config)?;
    let product_ids = if config.product_ids.is_empty() {
        catalog.product_ids()?
    } else {
        ProductIds::new(config.product_ids.iter().cloned())?
    };

    let context = StoreContext::new();
    let platform = SandboxPlatform::new(catalog);
    let service = StandardStoreService::with_platform(product_ids, context.clone(), platform);

    service.sync_store_data().await?;
    tracing::info!(products = context.len(), "store synced");

    let purchase = match &config.purchase {
        Some(id) => {
            let product = context
                .product(&ProductId::new(id.as_str()))
                .ok_or_else(|| CliError::UnknownProduct(id.clone()))?;
            Some(service.purchase(&product).await?)
        }
        None => None,
    };

    Ok(RunReport {
        products: context.products().to_vec(),
        purchase,
    })
}
