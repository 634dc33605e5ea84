//! Pure reordering logic, independent of any store.

use super::{Direction, OrderError};
use crate::store::Ranked;

/// A single rank to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankWrite {
    pub id: String,
    pub order: u32,
}

/// Result of planning a move against the current sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum MovePlan<R> {
    /// The record is already first (moving up) or last (moving down).
    Boundary,
    Swap {
        from: usize,
        to: usize,
        /// The whole sequence after the swap, renumbered `1..=N`.
        records: Vec<R>,
        /// Records whose rank differs from its value before the move.
        writes: Vec<RankWrite>,
    },
}

/// Sort ascending by rank, missing ranks first.
///
/// The sort is stable: records sharing a rank keep their fetch order.
pub fn sort_by_rank<R: Ranked>(records: &mut [R]) {
    records.sort_by_key(|r| r.order().unwrap_or(0));
}

#[must_use]
pub fn position_of<R: Ranked>(records: &[R], id: &str) -> Option<usize> {
    records.iter().position(|r| r.id() == id)
}

/// 1-based rank for a zero-based position.
fn rank_at(position: usize) -> u32 {
    u32::try_from(position)
        .ok()
        .and_then(|p| p.checked_add(1))
        .unwrap_or(u32::MAX)
}

/// Assign `position + 1` to every record and return the ranks that changed.
pub fn renumber<R: Ranked>(records: &mut [R]) -> Vec<RankWrite> {
    let mut writes = Vec::new();
    for (position, record) in records.iter_mut().enumerate() {
        let rank = rank_at(position);
        if record.order() != Some(rank) {
            record.set_order(rank);
            writes.push(RankWrite {
                id: record.id().to_string(),
                order: rank,
            });
        }
    }
    writes
}

/// Plan moving `id` one position in `direction`.
///
/// The swap is positional and followed by a full renumbering pass, so the
/// planned sequence always carries ranks `1..=N` whatever ranks it started
/// with.
pub fn plan_move<R: Ranked>(
    records: &[R],
    id: &str,
    direction: Direction,
) -> Result<MovePlan<R>, OrderError> {
    let from = position_of(records, id).ok_or_else(|| OrderError::NotFound(id.to_string()))?;
    let Some(to) = direction.target(from, records.len()) else {
        return Ok(MovePlan::Boundary);
    };

    let mut reordered = records.to_vec();
    reordered.swap(from, to);
    let writes = renumber(&mut reordered);

    Ok(MovePlan::Swap {
        from,
        to,
        records: reordered,
        writes,
    })
}

/// Whether the ranks are exactly `{1..=N}` with no duplicates.
#[must_use]
pub fn is_contiguous<R: Ranked>(records: &[R]) -> bool {
    let mut ranks: Vec<u32> = records.iter().filter_map(Ranked::order).collect();
    if ranks.len() != records.len() {
        return false;
    }
    ranks.sort_unstable();
    ranks.iter().zip(1_u32..).all(|(&rank, expected)| rank == expected)
}
