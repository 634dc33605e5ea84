//! Persistence collaborators for ranked collections.
//!
//! The ordering manager only needs two operations from a backing store:
//! fetch the whole collection and write one record's rank. Every store in
//! this module implements [`RankStore`] for that purpose.

mod error;
mod http;
mod markdown;
mod memory;

pub use error::StoreError;
pub use http::{HttpStore, LOVE_STORIES_PATH};
pub use markdown::MarkdownStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

/// A record that carries a display rank.
///
/// Everything beyond `id` and `order` is opaque to the ordering manager.
pub trait Ranked: Clone + Send + Sync + 'static {
    /// Stable identifier assigned by the store.
    fn id(&self) -> &str;

    /// Display rank, 1-based. `None` sorts as 0.
    fn order(&self) -> Option<u32>;

    fn set_order(&mut self, order: u32);
}

/// Backing store for a ranked collection.
#[async_trait]
pub trait RankStore: Send + Sync {
    type Record: Ranked;

    /// Fetch every record of the collection, in any order.
    async fn fetch_all(&self) -> Result<Vec<Self::Record>, StoreError>;

    /// Persist a single record's rank.
    ///
    /// Must be idempotent: the manager never tracks which writes of a batch
    /// landed, so the same value may be written again later.
    async fn update_order(&self, id: &str, order: u32) -> Result<(), StoreError>;
}
