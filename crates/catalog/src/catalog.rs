//! Product catalogs loaded from JSON documents.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ids::{ProductId, ProductIds};
use crate::product::{Price, Product, ProductKind};

/// A list of product descriptors, as served by a platform sandbox.
///
/// The JSON form is `{ "products": [ ... ] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
}

impl Catalog {
    /// Creates a catalog from product descriptors.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parses a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Returns the identifiers of every product, in catalog order.
    pub fn product_ids(&self) -> Result<ProductIds> {
        ProductIds::new(self.products.iter().map(|p| p.id().clone()))
    }

    /// Looks up a product by identifier.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == id)
    }

    /// A small built-in catalog used when no catalog file is configured.
    pub fn demo() -> Self {
        Self::new(vec![
            Product::new(
                "pro_monthly",
                "Pro Monthly",
                Price::new(499, "USD"),
                ProductKind::AutoRenewable,
            )
            .with_description("All pro features, billed monthly"),
            Product::new(
                "pro_yearly",
                "Pro Yearly",
                Price::new(3999, "USD"),
                ProductKind::AutoRenewable,
            )
            .with_description("All pro features, billed yearly"),
            Product::new(
                "lifetime",
                "Lifetime Unlock",
                Price::new(9999, "USD"),
                ProductKind::NonConsumable,
            ),
            Product::new(
                "coins_100",
                "100 Coins",
                Price::new(99, "USD"),
                ProductKind::Consumable,
            ),
        ])
    }
}
