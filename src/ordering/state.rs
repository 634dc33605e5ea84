use std::fmt;

/// Lifecycle state of an [`OrderedCollection`](super::OrderedCollection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollectionState {
    /// The sequence reflects the last successful load or move.
    #[default]
    Idle,
    /// A move has been applied locally and its rank writes are in flight.
    Reordering,
    /// A rank write failed; the collection is being reloaded from the store.
    Resyncing,
    /// The last load failed. The sequence is untrustworthy and moves are
    /// refused until a reload succeeds.
    Desynced,
}

impl CollectionState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionState::Idle => "idle",
            CollectionState::Reordering => "reordering",
            CollectionState::Resyncing => "resyncing",
            CollectionState::Desynced => "desynced",
        }
    }
}

impl fmt::Display for CollectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What views observe through [`OrderedCollection::subscribe`](super::OrderedCollection::subscribe).
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<R> {
    pub state: CollectionState,
    pub records: Vec<R>,
}
