use crate::store::StoreError;
use thiserror::Error;

/// Errors surfaced by [`OrderedCollection`](super::OrderedCollection).
///
/// Failed rank writes are not an error: the manager resyncs and reports
/// [`MoveOutcome::Resynced`](super::MoveOutcome::Resynced). Only a failed
/// load leaves the caller with something to handle.
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Failed to load collection: {0}")]
    Load(#[source] StoreError),

    #[error("{failed_writes} rank write(s) failed and the resync load failed: {source}")]
    ResyncFailed {
        failed_writes: usize,
        #[source]
        source: StoreError,
    },

    #[error("Collection is out of sync with the store; reload before reordering")]
    Desynced,
}

impl OrderError {
    /// Whether the manager must be reloaded before it can reorder again.
    #[must_use]
    pub fn requires_reload(&self) -> bool {
        !matches!(self, OrderError::NotFound(_))
    }
}
