//! Read-only views of an event's queue.

use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::debug;

use crate::db::events as event_db;
use crate::db::signups as signup_db;
use crate::error::{QueueError, QueueResult};
use crate::models::signups::{PublicSignup, SignupStatus, SignupWithSong};

/// How many waiting signups the board shows after the on-deck performer.
pub const UP_NEXT_LEN: usize = 3;

/// What the band sees: who is on stage, who is next and how long the line is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Board {
    pub event_id: i32,
    pub event_name: String,
    pub queue_version: i32,
    pub now_performing: Option<PublicSignup>,
    pub on_deck: Option<PublicSignup>,
    pub up_next: Vec<PublicSignup>,
    pub total_waiting: usize,
}

pub async fn board(db: &DatabaseConnection, event_id: i32) -> QueueResult<Board> {
    let event = event_db::get_event_by_id(db, event_id)
        .await?
        .ok_or(QueueError::not_found("Event", event_id))?;

    let active = signup_db::get_signups_with_songs(db, event_id, &SignupStatus::ACTIVE).await?;

    let mut now_performing = None;
    let mut on_deck = None;
    let mut waiting = Vec::new();
    for entry in active.into_iter().map(PublicSignup::from) {
        match entry.status {
            SignupStatus::Performing => now_performing = Some(entry),
            SignupStatus::OnDeck => on_deck = Some(entry),
            _ => waiting.push(entry),
        }
    }

    let total_waiting = waiting.len();
    waiting.truncate(UP_NEXT_LEN);

    debug!(event_id, total_waiting, "Board loaded");
    Ok(Board {
        event_id,
        event_name: event.name,
        queue_version: event.queue_version,
        now_performing,
        on_deck,
        up_next: waiting,
        total_waiting,
    })
}

/// Every signup of an event in queue order, whatever its status. Host only:
/// entries carry the owning device and host notes.
pub async fn list_signups(
    db: &DatabaseConnection,
    event_id: i32,
) -> QueueResult<Vec<SignupWithSong>> {
    let rows = signup_db::get_signups_with_songs(db, event_id, &[]).await?;
    Ok(rows.into_iter().map(SignupWithSong::from).collect())
}

pub async fn get_signup(db: &DatabaseConnection, signup_id: i32) -> QueueResult<PublicSignup> {
    signup_db::get_signup_with_song(db, signup_id)
        .await?
        .map(PublicSignup::from)
        .ok_or(QueueError::not_found("Signup", signup_id))
}

/// A device's own signups for an event and its place in line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceView {
    pub signups: Vec<PublicSignup>,
    /// Active signups ahead of the device's earliest active signup.
    pub ahead: Option<usize>,
}

pub async fn device_view(
    db: &DatabaseConnection,
    event_id: i32,
    device_id: &str,
) -> QueueResult<DeviceView> {
    let signups: Vec<PublicSignup> = signup_db::get_signups_for_device(db, event_id, device_id)
        .await?
        .into_iter()
        .map(PublicSignup::from)
        .collect();

    let ahead = if signups.iter().any(|s| s.status.is_active()) {
        let order = super::ordering::active_position_order(db, event_id).await?;
        order.iter().position(|s| s.device_id == device_id)
    } else {
        None
    };

    Ok(DeviceView { signups, ahead })
}
