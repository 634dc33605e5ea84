//! Display-order management for ranked collections.
//!
//! [`OrderedCollection`] holds a collection sorted by rank, moves records one
//! position at a time, and keeps the local sequence converged with its
//! [`RankStore`](crate::store::RankStore).

mod direction;
mod error;
mod manager;
pub mod plan;
mod state;

pub use direction::{Direction, DirectionError};
pub use error::OrderError;
pub use manager::{
    CollectionConfig, MoveOutcome, MoveReport, OrderedCollection, DEFAULT_WRITE_TIMEOUT,
};
pub use plan::{is_contiguous, sort_by_rank, MovePlan, RankWrite};
pub use state::{CollectionState, Snapshot};
