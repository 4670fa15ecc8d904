//! Signup admission: creating, editing and cancelling a device's signups.

use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, IntoActiveModel, Set, TransactionTrait};
use tracing::info;

use crate::db::devices as device_db;
use crate::db::signups::{self as signup_db, NewSignup};
use crate::db::songs as song_db;
use crate::error::{QueueError, QueueResult};
use crate::models::signups::{
    self, normalize, CreateSignup, Performance, PerformanceChange, SignupCreated, SignupPatch,
    SignupStatus,
};

/// Longest accepted device identifier.
const MAX_DEVICE_ID_LEN: usize = 128;

fn validate_device_id(device_id: &str) -> QueueResult<()> {
    if device_id.trim().is_empty() || device_id.len() > MAX_DEVICE_ID_LEN {
        return Err(QueueError::Validation(
            "A valid device id is required".to_string(),
        ));
    }
    Ok(())
}

async fn ensure_song_exists<C: ConnectionTrait>(db: &C, performance: &Performance) -> QueueResult<()> {
    if let Some(song_id) = performance.song_id() {
        if song_db::get_song_by_id(db, song_id).await?.is_none() {
            return Err(QueueError::SongNotFound(song_id));
        }
    }
    Ok(())
}

/// Admit a new signup to the end of an event's queue.
pub async fn create_signup(
    db: &DatabaseConnection,
    device_id: &str,
    input: CreateSignup,
) -> QueueResult<SignupCreated> {
    validate_device_id(device_id)?;
    let performer_name = normalize(Some(input.performer_name))
        .ok_or_else(|| QueueError::Validation("Performer name is required".to_string()))?;
    let performance = Performance::from_parts(input.kind, input.song_id, input.request_text)?;
    let notes = normalize(input.notes);

    // Registered outside the transaction: a failed insert would abort it.
    device_db::ensure_device(db, device_id).await?;

    let txn = db.begin().await?;
    let event = super::lock_active_queue(&txn, input.event_id).await?;

    if !event.allow_multiple_signups
        && signup_db::find_active_for_device(&txn, event.id, device_id)
            .await?
            .is_some()
    {
        return Err(QueueError::DuplicateActiveSignup);
    }

    ensure_song_exists(&txn, &performance).await?;

    let position = super::ordering::append(&txn, &event).await?;
    let signup = signup_db::insert_signup(
        &txn,
        NewSignup {
            event_id: event.id,
            device_id: device_id.to_string(),
            performer_name,
            performance,
            position,
            notes,
        },
    )
    .await?;

    txn.commit().await?;

    info!(
        signup_id = signup.id,
        event_id = signup.event_id,
        position,
        "Signup created"
    );

    Ok(SignupCreated {
        id: signup.id,
        position: signup.position,
        request_status: signup.request_status,
    })
}

/// Load a signup and check that `device_id` owns it.
async fn owned_signup<C: ConnectionTrait>(
    db: &C,
    signup_id: i32,
    device_id: &str,
    action: &'static str,
) -> QueueResult<signups::Model> {
    let signup = signup_db::get_signup_by_id(db, signup_id)
        .await?
        .ok_or(QueueError::not_found("Signup", signup_id))?;

    if signup.device_id != device_id {
        return Err(QueueError::NotAuthorized(action));
    }

    Ok(signup)
}

/// Apply a device's edit to its own waiting signup.
pub async fn edit_signup(
    db: &DatabaseConnection,
    signup_id: i32,
    device_id: &str,
    patch: SignupPatch,
) -> QueueResult<signups::Model> {
    let signup = owned_signup(db, signup_id, device_id, "edit this signup").await?;

    let txn = db.begin().await?;
    super::lock_active_queue(&txn, signup.event_id).await?;

    let signup = owned_signup(&txn, signup_id, device_id, "edit this signup").await?;
    if signup.status != SignupStatus::Waiting {
        return Err(QueueError::InvalidState {
            current: signup.status,
            action: "edit",
        });
    }

    let current = signup.performance();
    let mut active = signup.into_active_model();

    if let Some(name) = patch.performer_name {
        active.performer_name = Set(name);
    }
    if let Some(notes) = patch.notes {
        active.notes = Set(notes);
    }
    if let Some(change) = patch.performance {
        // `WithBand` alone keeps the current selection and its review state.
        let keeps_selection = change == PerformanceChange::WithBand;
        let performance = change.resolve(current)?;
        if !keeps_selection {
            ensure_song_exists(&txn, &performance).await?;
            performance.write_to(&mut active);
        }
    }

    let updated = if active.is_changed() {
        signup_db::save_signup(&txn, active).await?
    } else {
        signup_db::get_signup_by_id(&txn, signup_id)
            .await?
            .ok_or(QueueError::not_found("Signup", signup_id))?
    };

    txn.commit().await?;

    info!(signup_id, event_id = updated.event_id, "Signup edited");
    Ok(updated)
}

/// Withdraw a device's own signup. A performer on stage cannot cancel.
pub async fn cancel_signup(
    db: &DatabaseConnection,
    signup_id: i32,
    device_id: &str,
) -> QueueResult<signups::Model> {
    let signup = owned_signup(db, signup_id, device_id, "cancel this signup").await?;

    let txn = db.begin().await?;
    super::lock_active_queue(&txn, signup.event_id).await?;

    let signup = owned_signup(&txn, signup_id, device_id, "cancel this signup").await?;
    if signup.status == SignupStatus::Performing {
        return Err(QueueError::InvalidState {
            current: signup.status,
            action: "cancel",
        });
    }

    let cancelled = super::status::transition(&txn, signup, SignupStatus::Cancelled).await?;
    txn.commit().await?;

    Ok(cancelled)
}

/// Replace the host's private notes on a signup.
pub async fn set_host_notes(
    db: &DatabaseConnection,
    signup_id: i32,
    host_notes: Option<String>,
) -> QueueResult<signups::Model> {
    let signup = signup_db::get_signup_by_id(db, signup_id)
        .await?
        .ok_or(QueueError::not_found("Signup", signup_id))?;

    let txn = db.begin().await?;
    super::lock_active_queue(&txn, signup.event_id).await?;

    let signup = signup_db::get_signup_by_id(&txn, signup_id)
        .await?
        .ok_or(QueueError::not_found("Signup", signup_id))?;
    let mut active = signup.into_active_model();
    active.host_notes = Set(normalize(host_notes));
    let updated = signup_db::save_signup(&txn, active).await?;

    txn.commit().await?;

    info!(signup_id, "Host notes updated");
    Ok(updated)
}
