use super::plan::{plan_move, sort_by_rank, MovePlan, RankWrite};
use super::{CollectionState, Direction, OrderError, Snapshot};
use crate::store::{RankStore, StoreError};
use futures::future::join_all;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Default bound on a single rank write.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionConfig {
    /// A rank write that takes longer than this counts as failed.
    pub write_timeout: Duration,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

/// How a move ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The swap was persisted; `writes` ranks were written.
    Applied { writes: usize },
    /// The record was already at the edge; nothing changed.
    Boundary,
    /// Some writes failed and the sequence was reloaded from the store.
    /// The move may or may not have taken effect.
    Resynced { failed_writes: usize },
}

/// Result of [`OrderedCollection::move_record`].
#[derive(Debug, Clone, PartialEq)]
pub struct MoveReport<R> {
    pub outcome: MoveOutcome,
    /// The sequence after the move (or after the resync).
    pub records: Vec<R>,
}

/// Keeps a ranked collection in display order and persists moves.
///
/// Moves are applied to the local sequence first and published to
/// subscribers before any write is issued. Every rank that changed is then
/// written concurrently. If any write fails or times out the local state is
/// thrown away and the collection is reloaded from the store.
///
/// `move_record` and `reload` take `&mut self`, so a second move can never
/// start from the same base state while the first one is still in flight.
pub struct OrderedCollection<S: RankStore> {
    store: S,
    config: CollectionConfig,
    records: Vec<S::Record>,
    state: CollectionState,
    snapshots: watch::Sender<Snapshot<S::Record>>,
}

impl<S: RankStore> OrderedCollection<S> {
    /// Load the collection from `store`.
    pub async fn open(store: S, config: CollectionConfig) -> Result<Self, OrderError> {
        let records = fetch_sorted(&store).await.map_err(OrderError::Load)?;
        info!(count = records.len(), "Loaded ranked collection");

        let (snapshots, _) = watch::channel(Snapshot {
            state: CollectionState::Idle,
            records: records.clone(),
        });
        Ok(Self {
            store,
            config,
            records,
            state: CollectionState::Idle,
            snapshots,
        })
    }

    /// Current sequence, in display order.
    #[must_use]
    pub fn records(&self) -> &[S::Record] {
        &self.records
    }

    #[must_use]
    pub fn state(&self) -> CollectionState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> CollectionConfig {
        self.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Observe every state change, including the optimistic one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<S::Record>> {
        self.snapshots.subscribe()
    }

    fn publish(&mut self, state: CollectionState) {
        self.state = state;
        self.snapshots.send_replace(Snapshot {
            state,
            records: self.records.clone(),
        });
    }

    /// Replace the sequence with the store's current contents.
    ///
    /// Ranks are sorted, never rewritten. On failure the collection is marked
    /// [`CollectionState::Desynced`] and refuses moves until a reload succeeds.
    pub async fn reload(&mut self) -> Result<&[S::Record], OrderError> {
        match fetch_sorted(&self.store).await {
            Ok(records) => {
                debug!(count = records.len(), "Reloaded ranked collection");
                self.records = records;
                self.publish(CollectionState::Idle);
                Ok(&self.records)
            }
            Err(e) => {
                error!(error = %e, "Failed to reload ranked collection");
                self.publish(CollectionState::Desynced);
                Err(OrderError::Load(e))
            }
        }
    }

    /// Move record `id` one position up or down.
    ///
    /// A move past either end is a no-op reported as
    /// [`MoveOutcome::Boundary`]. Failed writes are recovered by reloading and
    /// reported as [`MoveOutcome::Resynced`]; only a failed reload is an error.
    pub async fn move_record(
        &mut self,
        id: &str,
        direction: Direction,
    ) -> Result<MoveReport<S::Record>, OrderError> {
        if self.state == CollectionState::Desynced {
            return Err(OrderError::Desynced);
        }

        let (from, to, records, writes) = match plan_move(&self.records, id, direction)? {
            MovePlan::Boundary => {
                debug!(id, %direction, "Move ignored at collection boundary");
                return Ok(MoveReport {
                    outcome: MoveOutcome::Boundary,
                    records: self.records.clone(),
                });
            }
            MovePlan::Swap {
                from,
                to,
                records,
                writes,
            } => (from, to, records, writes),
        };

        debug!(id, %direction, from, to, writes = writes.len(), "Applying move locally");
        self.records = records;
        self.publish(CollectionState::Reordering);

        let failed_writes = self.persist(&writes).await;
        if failed_writes == 0 {
            info!(id, %direction, writes = writes.len(), "Move persisted");
            self.publish(CollectionState::Idle);
            return Ok(MoveReport {
                outcome: MoveOutcome::Applied {
                    writes: writes.len(),
                },
                records: self.records.clone(),
            });
        }

        warn!(id, failed_writes, "Rank writes failed, resyncing from store");
        self.publish(CollectionState::Resyncing);
        match self.reload().await {
            Ok(records) => Ok(MoveReport {
                outcome: MoveOutcome::Resynced { failed_writes },
                records: records.to_vec(),
            }),
            Err(OrderError::Load(source)) => Err(OrderError::ResyncFailed {
                failed_writes,
                source,
            }),
            Err(other) => Err(other),
        }
    }

    /// Issue every write concurrently; return how many failed.
    async fn persist(&self, writes: &[RankWrite]) -> usize {
        let timeout = self.config.write_timeout;
        let store = &self.store;

        let results = join_all(writes.iter().map(|write| async move {
            let result = match tokio::time::timeout(
                timeout,
                store.update_order(&write.id, write.order),
            )
            .await
            {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!("timed out after {timeout:?}")),
            };
            (write, result)
        }))
        .await;

        let mut failed: usize = 0;
        for (write, result) in results {
            if let Err(reason) = result {
                warn!(id = %write.id, order = write.order, %reason, "Rank write failed");
                failed = failed.saturating_add(1);
            }
        }
        failed
    }
}

async fn fetch_sorted<S: RankStore>(store: &S) -> Result<Vec<S::Record>, StoreError> {
    let mut records = store.fetch_all().await?;
    sort_by_rank(&mut records);
    Ok(records)
}
