//! Purchase outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::ProductId;

/// Unique identifier for a completed platform transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Creates a new random transaction ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a transaction ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to the platform transaction behind a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub product_id: ProductId,
    pub purchased_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates a transaction for a product, stamped with the current time.
    pub fn new(product_id: ProductId) -> Self {
        Self {
            id: TransactionId::new(),
            product_id,
            purchased_at: Utc::now(),
        }
    }
}

/// Outcome of a single purchase attempt.
///
/// Expected outcomes such as cancellation or pending approval are variants
/// here rather than errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PurchaseResult {
    /// The purchase went through.
    Succeeded { transaction: Transaction },
    /// The user dismissed the purchase.
    UserCancelled,
    /// Awaiting external approval, e.g. parental consent.
    Pending,
    /// The platform declined the purchase.
    Failed { reason: String },
}

impl PurchaseResult {
    /// Creates a successful result carrying the given transaction.
    pub fn succeeded(transaction: Transaction) -> Self {
        PurchaseResult::Succeeded { transaction }
    }

    /// Creates a failed result with the given reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        PurchaseResult::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PurchaseResult::Succeeded { .. })
    }

    /// Returns the transaction of a successful purchase.
    pub fn transaction(&self) -> Option<&Transaction> {
        match self {
            PurchaseResult::Succeeded { transaction } => Some(transaction),
            _ => None,
        }
    }

    /// Returns the outcome name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseResult::Succeeded { .. } => "succeeded",
            PurchaseResult::UserCancelled => "user_cancelled",
            PurchaseResult::Pending => "pending",
            PurchaseResult::Failed { .. } => "failed",
        }
    }
}

impl std::fmt::Display for PurchaseResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurchaseResult::Succeeded { transaction } => {
                write!(f, "succeeded ({})", transaction.id)
            }
            PurchaseResult::Failed { reason } => write!(f, "failed: {reason}"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}
