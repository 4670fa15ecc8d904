//! The performer status state machine.
//!
//! | from            | to         |
//! |-----------------|------------|
//! | waiting         | on_deck    |
//! | on_deck         | performing |
//! | performing      | completed  |
//! | waiting/on_deck | no_show    |
//! | waiting/on_deck | cancelled  |
//!
//! Terminal statuses accept themselves again as a no-op. Everything else is
//! an `InvalidTransition`.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, SqlErr, TransactionTrait};
use serde::Serialize;
use tracing::info;

use crate::db::signups as signup_db;
use crate::db::songs as song_db;
use crate::error::{QueueError, QueueResult};
use crate::models::signups::{self, SignupStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCheck {
    Apply,
    /// Terminal status re-applied; nothing to write.
    Noop,
}

/// Look a transition up in the table.
pub fn check_transition(from: SignupStatus, to: SignupStatus) -> QueueResult<TransitionCheck> {
    use SignupStatus::*;

    if from == to && from.is_terminal() {
        return Ok(TransitionCheck::Noop);
    }

    let allowed = matches!(
        (from, to),
        (Waiting, OnDeck)
            | (OnDeck, Performing)
            | (Performing, Completed)
            | (Waiting | OnDeck, NoShow)
            | (Waiting | OnDeck, Cancelled)
    );

    if allowed {
        Ok(TransitionCheck::Apply)
    } else {
        Err(QueueError::InvalidTransition { from, to })
    }
}

/// Map a failed status write. The partial unique indexes on `on_deck` and
/// `performing` surface a racing writer as a unique violation.
pub fn status_write_error(err: DbErr, to: SignupStatus) -> QueueError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => QueueError::OccupancyConflict {
            status: to,
            holder: None,
        },
        _ => QueueError::Db(err),
    }
}

/// Apply one transition inside a transaction that already holds the event lock.
pub(crate) async fn transition<C: ConnectionTrait>(
    db: &C,
    signup: signups::Model,
    to: SignupStatus,
) -> QueueResult<signups::Model> {
    let from = signup.status;
    if check_transition(from, to)? == TransitionCheck::Noop {
        return Ok(signup);
    }

    if to.is_single_occupant() {
        if let Some(holder) = signup_db::find_holder(db, signup.event_id, to, signup.id).await? {
            return Err(QueueError::OccupancyConflict {
                status: to,
                holder: Some(holder.id),
            });
        }
    }

    let changed = signup_db::set_status_if(db, signup.id, from, to)
        .await
        .map_err(|e| status_write_error(e, to))?;

    if changed == 0 {
        return Err(QueueError::Conflict(format!(
            "signup {} is no longer {from}",
            signup.id
        )));
    }

    if to == SignupStatus::Completed {
        if let Some(song_id) = signup.song_id {
            song_db::record_play(db, song_id, chrono::Utc::now()).await?;
        }
    }

    info!(
        signup_id = signup.id,
        event_id = signup.event_id,
        "Signup moved from {from} to {to}"
    );

    signup_db::get_signup_by_id(db, signup.id)
        .await?
        .ok_or(QueueError::not_found("Signup", signup.id))
}

/// Move a signup to a new status as one atomic operation.
pub async fn change_status(
    db: &DatabaseConnection,
    signup_id: i32,
    to: SignupStatus,
) -> QueueResult<signups::Model> {
    let signup = signup_db::get_signup_by_id(db, signup_id)
        .await?
        .ok_or(QueueError::not_found("Signup", signup_id))?;

    let txn = db.begin().await?;
    super::lock_active_queue(&txn, signup.event_id).await?;

    // Re-read under the lock; the first read only located the event.
    let current = signup_db::get_signup_by_id(&txn, signup_id)
        .await?
        .ok_or(QueueError::not_found("Signup", signup_id))?;
    let updated = transition(&txn, current, to).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Result of advancing the show by one slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShowAdvance {
    pub completed: Option<signups::Model>,
    pub performing: Option<signups::Model>,
    pub on_deck: Option<signups::Model>,
}

/// Advance the show: the current performer completes, the on-deck performer
/// takes the stage and the first waiting signup moves on deck.
pub async fn advance(db: &DatabaseConnection, event_id: i32) -> QueueResult<ShowAdvance> {
    let txn = db.begin().await?;
    super::lock_active_queue(&txn, event_id).await?;

    let active = signup_db::get_signups_by_status(&txn, event_id, &SignupStatus::ACTIVE).await?;
    let find = |status: SignupStatus| active.iter().find(|s| s.status == status).cloned();
    let (performing, on_deck, next_up) = (
        find(SignupStatus::Performing),
        find(SignupStatus::OnDeck),
        find(SignupStatus::Waiting),
    );

    // Free each slot before filling it.
    let mut outcome = ShowAdvance::default();
    if let Some(signup) = performing {
        outcome.completed = Some(transition(&txn, signup, SignupStatus::Completed).await?);
    }
    if let Some(signup) = on_deck {
        outcome.performing = Some(transition(&txn, signup, SignupStatus::Performing).await?);
    }
    if let Some(signup) = next_up {
        outcome.on_deck = Some(transition(&txn, signup, SignupStatus::OnDeck).await?);
    }

    txn.commit().await?;

    info!(event_id, "Show advanced");
    Ok(outcome)
}
