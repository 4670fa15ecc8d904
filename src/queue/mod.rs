//! The queue engine: ordering, the status state machine, signup admission,
//! the song request workflow and the event lifecycle.
//!
//! Every mutating operation runs as one transaction that starts by locking the
//! owning event row, so writers to the same queue are serialised by the store.

pub mod admission;
pub mod board;
pub mod library;
pub mod lifecycle;
pub mod ordering;
pub mod requests;
pub mod status;

use std::future::Future;

use sea_orm::ConnectionTrait;

use crate::db::events as event_db;
use crate::error::{QueueError, QueueResult};
use crate::models::events::{self, EventStatus};

/// Lock an event's queue and require the event to be accepting changes.
pub(crate) async fn lock_active_queue<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
) -> QueueResult<events::Model> {
    let event = event_db::lock_queue(db, event_id)
        .await?
        .ok_or(QueueError::not_found("Event", event_id))?;

    if event.status != EventStatus::Active {
        return Err(QueueError::EventNotActive {
            event_id,
            status: event.status,
        });
    }

    Ok(event)
}

/// Run an operation, retrying it once with fresh state if it lost a
/// compare-and-swap race. A second conflict is returned to the caller.
pub async fn retry_on_conflict<T, F, Fut>(mut op: F) -> QueueResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = QueueResult<T>>,
{
    match op().await {
        Err(QueueError::Conflict(reason)) => {
            tracing::warn!("Retrying after concurrent update: {reason}");
            op().await
        }
        other => other,
    }
}
