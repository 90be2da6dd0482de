//! Resolved product descriptors.

use serde::{Deserialize, Serialize};

use crate::ids::{ProductId, ProductRepresentable};

/// Price in the smallest unit of its currency, to avoid floating point issues.
///
/// Formatting for display is left to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in minor units (e.g., 499 = 4.99 in a two-decimal currency).
    minor_units: i64,
    /// ISO 4217 currency code.
    currency: String,
}

impl Price {
    /// Creates a price from minor units and a currency code.
    pub fn new(minor_units: i64, currency: impl Into<String>) -> Self {
        Self {
            minor_units,
            currency: currency.into(),
        }
    }

    /// Returns the amount in minor units.
    pub fn minor_units(&self) -> i64 {
        self.minor_units
    }

    /// Returns the ISO 4217 currency code.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns true if the product is free.
    pub fn is_free(&self) -> bool {
        self.minor_units == 0
    }
}

/// The kind of offering a product represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// Can be bought repeatedly and is used up.
    Consumable,
    /// Bought once and kept forever.
    NonConsumable,
    /// Subscription renewed by the platform until cancelled.
    AutoRenewable,
    /// Time-limited access that does not renew on its own.
    NonRenewing,
}

impl ProductKind {
    /// Returns true for both subscription kinds.
    pub fn is_subscription(&self) -> bool {
        matches!(self, ProductKind::AutoRenewable | ProductKind::NonRenewing)
    }

    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Consumable => "consumable",
            ProductKind::NonConsumable => "non_consumable",
            ProductKind::AutoRenewable => "auto_renewable",
            ProductKind::NonRenewing => "non_renewing",
        }
    }
}

impl std::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A purchasable product resolved from the platform catalog.
///
/// Immutable once fetched: a later fetch produces new instances instead of
/// updating these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    display_name: String,
    #[serde(default)]
    description: String,
    price: Price,
    kind: ProductKind,
}

impl Product {
    /// Creates a product descriptor with an empty description.
    pub fn new(
        id: impl Into<ProductId>,
        display_name: impl Into<String>,
        price: Price,
        kind: ProductKind,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: String::new(),
            price,
            kind,
        }
    }

    /// Returns a copy of this descriptor with the given description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> &Price {
        &self.price
    }

    pub fn kind(&self) -> ProductKind {
        self.kind
    }
}

impl ProductRepresentable for Product {
    fn id(&self) -> ProductId {
        self.id.clone()
    }
}
