//! Product identifiers and the identifier set a service is bound to.

use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Identifier of a purchasable product, unique within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a product ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the product ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identifier is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ProductId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProductId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Anything that can name the product it stands for.
///
/// Apps usually keep their own enum or struct per offering; implementing
/// this lets the store service derive its identifier set from those values.
pub trait ProductRepresentable {
    /// The identifier of the represented product.
    fn id(&self) -> ProductId;
}

impl ProductRepresentable for ProductId {
    fn id(&self) -> ProductId {
        self.clone()
    }
}

impl ProductRepresentable for &str {
    fn id(&self) -> ProductId {
        ProductId::new(*self)
    }
}

/// Immutable, ordered set of product identifiers.
///
/// Fixes the catalog scope of every service constructed with it. Cloning
/// shares the underlying storage. Duplicates are kept as given; they are
/// wasteful but harmless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductIds(Arc<[ProductId]>);

impl ProductIds {
    /// Creates an identifier set, rejecting empty identifiers.
    pub fn new<I, T>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<ProductId>,
    {
        let ids: Vec<ProductId> = ids.into_iter().map(Into::into).collect();
        if let Some(position) = ids.iter().position(ProductId::is_empty) {
            return Err(CatalogError::EmptyProductId { position });
        }
        Ok(Self(ids.into()))
    }

    /// Derives an identifier set from product-representable values, in order.
    pub fn from_representables<R: ProductRepresentable>(values: &[R]) -> Result<Self> {
        Self::new(values.iter().map(|value| value.id()))
    }

    /// Returns the identifiers as a slice.
    pub fn as_slice(&self) -> &[ProductId] {
        &self.0
    }

    /// Returns the request position of an identifier, if it is in the set.
    pub fn position(&self, id: &ProductId) -> Option<usize> {
        self.0.iter().position(|candidate| candidate == id)
    }

    /// Returns true if the identifier is part of the set.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.position(id).is_some()
    }
}

impl Deref for ProductIds {
    type Target = [ProductId];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a ProductIds {
    type Item = &'a ProductId;
    type IntoIter = std::slice::Iter<'a, ProductId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
