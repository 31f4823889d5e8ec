//! Write outcomes

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of a fallback write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The value was encoded and persisted
    Saved,
    /// The value represents absence; the entry was removed
    Removed,
    /// The value could not be encoded; the stale entry was removed
    Cleared { reason: String },
    /// The backend rejected the store or the cleanup removal
    Failed { reason: String },
}

impl WriteOutcome {
    /// Whether the backend accepted the last operation it was asked to do
    ///
    /// `Cleared` counts as success: the encode failed, but removing the stale
    /// entry worked, so the store no longer holds an outdated value.
    pub fn is_success(&self) -> bool {
        !matches!(self, WriteOutcome::Failed { .. })
    }

    /// Whether the new value is now in the store
    pub fn is_saved(&self) -> bool {
        matches!(self, WriteOutcome::Saved)
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOutcome::Saved => write!(f, "saved"),
            WriteOutcome::Removed => write!(f, "removed"),
            WriteOutcome::Cleared { reason } => write!(f, "cleared ({})", reason),
            WriteOutcome::Failed { reason } => write!(f, "failed ({})", reason),
        }
    }
}

/// Success flag of the most recent write through one accessor
#[derive(Debug)]
pub(crate) struct WriteTracker(AtomicBool);

impl WriteTracker {
    pub(crate) fn new() -> Self {
        Self(AtomicBool::new(true))
    }

    pub(crate) fn record(&self, success: bool) {
        self.0.store(success, Ordering::Release);
    }

    pub(crate) fn record_outcome(&self, outcome: WriteOutcome) -> WriteOutcome {
        self.record(outcome.is_success());
        outcome
    }

    pub(crate) fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
