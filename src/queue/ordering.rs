//! Position bookkeeping for an event's queue.
//!
//! Positions come from a per-event counter that only moves forward, so an
//! appended signup is always placed after everything the event has seen.
//! `reorder` compacts the waiting line back to small contiguous numbers.

use std::collections::HashSet;

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tracing::info;

use crate::db::events as event_db;
use crate::db::signups as signup_db;
use crate::error::{QueueError, QueueResult};
use crate::models::events;
use crate::models::signups::{self, SignupStatus};

/// Next position for an event, given its counter and the highest position
/// found among its signups.
pub fn next_position(last_position: i32, max_existing: Option<i32>) -> i32 {
    last_position.max(max_existing.unwrap_or(0)) + 1
}

/// Hand out the next position of a locked event and advance its counter.
/// Must run inside the transaction that inserts the signup.
pub(crate) async fn append<C: ConnectionTrait>(
    db: &C,
    event: &events::Model,
) -> QueueResult<i32> {
    let max_existing = signup_db::max_position(db, event.id).await?;
    let position = next_position(event.last_position, max_existing);

    event_db::set_last_position(db, event.id, position).await?;

    Ok(position)
}

/// Check that a requested ordering is exactly the current waiting set.
pub fn validate_reorder(waiting: &[i32], requested: &[i32]) -> QueueResult<()> {
    let mut seen = HashSet::with_capacity(requested.len());
    let duplicates: Vec<i32> = requested
        .iter()
        .copied()
        .filter(|id| !seen.insert(*id))
        .collect();
    if !duplicates.is_empty() {
        return Err(QueueError::Validation(format!(
            "Signup ids appear more than once: {duplicates:?}"
        )));
    }

    let current: HashSet<i32> = waiting.iter().copied().collect();
    let mut unknown: Vec<i32> = seen.difference(&current).copied().collect();
    let mut missing: Vec<i32> = current.difference(&seen).copied().collect();

    if unknown.is_empty() && missing.is_empty() {
        return Ok(());
    }

    unknown.sort_unstable();
    missing.sort_unstable();
    Err(QueueError::Validation(format!(
        "Queue changed since it was loaded (not waiting: {unknown:?}, missing: {missing:?}); refresh and try again"
    )))
}

/// Pair each id with its new position, starting right after `base`.
pub fn assign_positions(base: i32, ordered: &[i32]) -> Vec<(i32, i32)> {
    ordered
        .iter()
        .zip(base + 1..)
        .map(|(&id, position)| (id, position))
        .collect()
}

/// Replace the order of the waiting line with `ordered_ids`.
///
/// The ids must be exactly the event's current waiting signups. Waiting
/// signups are renumbered after whoever is on stage, so the stage stays at
/// the head of the active order. Concurrent reorders resolve last-write-wins.
pub async fn reorder(
    db: &DatabaseConnection,
    event_id: i32,
    ordered_ids: &[i32],
) -> QueueResult<Vec<signups::Model>> {
    let txn = db.begin().await?;
    let event = super::lock_active_queue(&txn, event_id).await?;

    let waiting = signup_db::get_signups_by_status(&txn, event_id, &[SignupStatus::Waiting]).await?;
    let waiting_ids: Vec<i32> = waiting.iter().map(|s| s.id).collect();
    validate_reorder(&waiting_ids, ordered_ids)?;

    let stage = signup_db::get_signups_by_status(
        &txn,
        event_id,
        &[SignupStatus::OnDeck, SignupStatus::Performing],
    )
    .await?;
    let base = stage.iter().map(|s| s.position).max().unwrap_or(0);

    let positions = assign_positions(base, ordered_ids);
    signup_db::set_positions(&txn, event_id, &positions).await?;

    if let Some(&(_, last)) = positions.last() {
        if last > event.last_position {
            event_db::set_last_position(&txn, event_id, last).await?;
        }
    }

    let reordered =
        signup_db::get_signups_by_status(&txn, event_id, &[SignupStatus::Waiting]).await?;
    txn.commit().await?;

    info!(event_id, count = ordered_ids.len(), "Queue reordered");
    Ok(reordered)
}

/// Active signups (waiting, on deck, performing) sorted by position, ties
/// broken by id.
pub async fn active_position_order<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
) -> QueueResult<Vec<signups::Model>> {
    let active = signup_db::get_signups_by_status(db, event_id, &SignupStatus::ACTIVE).await?;
    Ok(active)
}
