//! In-process store with fault injection.

use super::{RankStore, Ranked, StoreError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug)]
struct MemoryState<R> {
    records: Vec<R>,
    failing_ids: HashSet<String>,
    fail_fetches: bool,
    update_delay: Option<Duration>,
    write_attempts: Vec<(String, u32)>,
    fetch_count: usize,
}

/// A [`RankStore`] holding records in memory.
///
/// Records are returned by `fetch_all` in insertion order, not rank order.
/// Failures and latency can be injected per store to exercise the manager's
/// resync path.
#[derive(Debug)]
pub struct MemoryStore<R> {
    state: Mutex<MemoryState<R>>,
}

impl<R: Ranked> MemoryStore<R> {
    #[must_use]
    pub fn new(records: Vec<R>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                records,
                failing_ids: HashSet::new(),
                fail_fetches: false,
                update_delay: None,
                write_attempts: Vec::new(),
                fetch_count: 0,
            }),
        }
    }

    /// Make every `update_order` call for `id` fail.
    pub async fn fail_updates_for(&self, id: impl Into<String>) {
        self.state.lock().await.failing_ids.insert(id.into());
    }

    /// Make `fetch_all` fail (or succeed again).
    pub async fn set_fail_fetches(&self, fail: bool) {
        self.state.lock().await.fail_fetches = fail;
    }

    /// Delay every `update_order` call by `delay`.
    pub async fn set_update_delay(&self, delay: Option<Duration>) {
        self.state.lock().await.update_delay = delay;
    }

    /// Remove every injected failure and delay.
    pub async fn clear_faults(&self) {
        let mut state = self.state.lock().await;
        state.failing_ids.clear();
        state.fail_fetches = false;
        state.update_delay = None;
    }

    /// Every `update_order` call received, successful or not, in arrival order.
    pub async fn write_attempts(&self) -> Vec<(String, u32)> {
        self.state.lock().await.write_attempts.clone()
    }

    /// Number of `fetch_all` calls received.
    pub async fn fetch_count(&self) -> usize {
        self.state.lock().await.fetch_count
    }

    /// Stored records in insertion order.
    pub async fn records(&self) -> Vec<R> {
        self.state.lock().await.records.clone()
    }

    pub async fn insert(&self, record: R) {
        self.state.lock().await.records.push(record);
    }

    /// Remove a record, returning whether it existed.
    pub async fn remove(&self, id: &str) -> bool {
        let mut state = self.state.lock().await;
        let before = state.records.len();
        state.records.retain(|r| r.id() != id);
        state.records.len() != before
    }
}

#[async_trait]
impl<R: Ranked> RankStore for MemoryStore<R> {
    type Record = R;

    async fn fetch_all(&self) -> Result<Vec<R>, StoreError> {
        let mut state = self.state.lock().await;
        state.fetch_count = state.fetch_count.saturating_add(1);
        if state.fail_fetches {
            return Err(StoreError::unavailable("injected fetch failure"));
        }
        Ok(state.records.clone())
    }

    async fn update_order(&self, id: &str, order: u32) -> Result<(), StoreError> {
        let delay = {
            let mut state = self.state.lock().await;
            state.write_attempts.push((id.to_string(), order));
            state.update_delay
        };

        // Sleep outside the lock so concurrent writes overlap.
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().await;
        if state.failing_ids.contains(id) {
            return Err(StoreError::unavailable(format!(
                "injected write failure for {id}"
            )));
        }
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found(id))?;
        record.set_order(order);
        debug!(id, order, "Stored rank in memory");
        Ok(())
    }
}
