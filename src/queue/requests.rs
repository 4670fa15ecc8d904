//! Host review of custom song requests.
//!
//! A request is `pending` until the host approves or declines it. Decisions
//! can be changed later; the last one wins. Reviewing never moves the signup
//! through the status state machine.

use sea_orm::{DatabaseConnection, IntoActiveModel, Set, TransactionTrait};
use tracing::info;

use crate::db::signups as signup_db;
use crate::error::{QueueError, QueueResult};
use crate::models::signups::{self, RequestStatus, ReviewDecision, SignupStatus, SignupWithSong};

/// Record the host's decision on a signup's song request.
pub async fn review_request(
    db: &DatabaseConnection,
    signup_id: i32,
    decision: ReviewDecision,
    reason: Option<String>,
) -> QueueResult<signups::Model> {
    let signup = signup_db::get_signup_by_id(db, signup_id)
        .await?
        .ok_or(QueueError::not_found("Signup", signup_id))?;

    let txn = db.begin().await?;
    super::lock_active_queue(&txn, signup.event_id).await?;

    let signup = signup_db::get_signup_by_id(&txn, signup_id)
        .await?
        .ok_or(QueueError::not_found("Signup", signup_id))?;
    if signup.request_text.is_none() {
        return Err(QueueError::NotARequest(signup_id));
    }

    let mut active = signup.into_active_model();
    match decision {
        ReviewDecision::Approved => {
            active.request_status = Set(Some(RequestStatus::Approved));
            active.decline_reason = Set(None);
        }
        ReviewDecision::Declined => {
            active.request_status = Set(Some(RequestStatus::Declined));
            active.decline_reason = Set(Some(
                reason.map(|r| r.trim().to_string()).unwrap_or_default(),
            ));
        }
    }
    let updated = signup_db::save_signup(&txn, active).await?;

    txn.commit().await?;

    info!(signup_id, ?decision, "Song request reviewed");
    Ok(updated)
}

/// Active signups whose song request still awaits a decision, in queue order.
pub async fn pending_requests(
    db: &DatabaseConnection,
    event_id: i32,
) -> QueueResult<Vec<SignupWithSong>> {
    let active = signup_db::get_signups_with_songs(db, event_id, &SignupStatus::ACTIVE).await?;

    Ok(active
        .into_iter()
        .filter(|(signup, _)| signup.request_status == Some(RequestStatus::Pending))
        .map(SignupWithSong::from)
        .collect())
}
