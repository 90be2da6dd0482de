//! Sync state machine.

/// The progress of a store sync.
///
/// State transitions:
/// ```text
/// Idle ──► Fetching ──► ContextUpdated ──► Restoring ──► Idle
///             │                                │
///             └───────── failure ──► Idle ◄────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SyncState {
    /// No sync is running.
    #[default]
    Idle,

    /// Products are being fetched.
    Fetching,

    /// Fetched products were written to the store context.
    ///
    /// Transient: the sync moves on to `Restoring` without yielding, so
    /// subscribers normally observe `Restoring` directly.
    ContextUpdated,

    /// Purchases are being restored.
    Restoring,
}

impl SyncState {
    /// Returns true if a sync is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self, SyncState::Idle)
    }

    /// Returns true if the store context was already written in this sync.
    pub fn has_updated_context(&self) -> bool {
        matches!(self, SyncState::ContextUpdated | SyncState::Restoring)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::Idle => "Idle",
            SyncState::Fetching => "Fetching",
            SyncState::ContextUpdated => "ContextUpdated",
            SyncState::Restoring => "Restoring",
        }
    }
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a cancellable sync ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Products were refreshed and purchases restored.
    Completed,

    /// The sync was cancelled while in `stage`.
    ///
    /// A stage of `Restoring` means the context already holds the fresh
    /// products while purchase state is not synced.
    Cancelled { stage: SyncState },
}

impl SyncOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SyncOutcome::Completed)
    }
}
