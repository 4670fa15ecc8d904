//! Event lifecycle: draft events are prepared, active events take signups,
//! closed events are read-only.

use sea_orm::{ConnectionTrait, DatabaseConnection, IntoActiveModel, Set, TransactionTrait};
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::events::{self as event_db, NewEvent};
use crate::error::{QueueError, QueueResult};
use crate::models::events::{self, CreateEvent, EventStatus, UpdateEvent};
use crate::models::signups::normalize;

const GENERATED_CODE_LEN: usize = 6;

/// A fresh join code: the first characters of a random UUID, uppercased.
pub fn generate_code() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(GENERATED_CODE_LEN)
        .collect::<String>()
        .to_uppercase()
}

/// Join codes are compared case-insensitively, so they are stored uppercased.
fn normalize_code(code: Option<String>) -> QueueResult<Option<String>> {
    match code {
        None => Ok(None),
        Some(raw) => {
            let code = raw.trim().to_uppercase();
            if code.is_empty() {
                return Err(QueueError::Validation(
                    "Event code cannot be empty".to_string(),
                ));
            }
            if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(QueueError::Validation(
                    "Event code may only contain letters, digits and dashes".to_string(),
                ));
            }
            Ok(Some(code))
        }
    }
}

async fn ensure_code_free<C: ConnectionTrait>(
    db: &C,
    code: &str,
    exclude: Option<i32>,
) -> QueueResult<()> {
    match event_db::get_event_by_code(db, code).await? {
        Some(existing) if Some(existing.id) != exclude => Err(QueueError::Validation(
            "Event code already exists".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Create a draft event. A join code is generated when none is given.
pub async fn create_event(db: &DatabaseConnection, input: CreateEvent) -> QueueResult<events::Model> {
    let name = normalize(Some(input.name))
        .ok_or_else(|| QueueError::Validation("Event name is required".to_string()))?;

    let code = match normalize_code(input.code)? {
        Some(code) => {
            ensure_code_free(db, &code, None).await?;
            code
        }
        None => loop {
            let candidate = generate_code();
            if event_db::get_event_by_code(db, &candidate).await?.is_none() {
                break candidate;
            }
        },
    };

    let event = event_db::insert_event(
        db,
        NewEvent {
            name,
            date: input.date,
            venue: normalize(input.venue),
            code,
            allow_multiple_signups: input.allow_multiple_signups.unwrap_or(false),
        },
    )
    .await?;

    info!(event_id = event.id, code = %event.code, "Event created");
    Ok(event)
}

pub async fn get_event(db: &DatabaseConnection, event_id: i32) -> QueueResult<events::Model> {
    event_db::get_event_by_id(db, event_id)
        .await?
        .ok_or(QueueError::not_found("Event", event_id))
}

/// Look an event up by the code performers type in to join.
pub async fn get_event_by_code(db: &DatabaseConnection, code: &str) -> QueueResult<events::Model> {
    let code = code.trim().to_uppercase();
    debug!(%code, "Looking up event by code");

    event_db::get_event_by_code(db, &code)
        .await?
        .ok_or(QueueError::UnknownCode(code))
}

pub async fn list_events(db: &DatabaseConnection) -> QueueResult<Vec<events::Model>> {
    Ok(event_db::get_all_events(db).await?)
}

/// Update an event's details. Closed events cannot change.
pub async fn update_event(
    db: &DatabaseConnection,
    event_id: i32,
    patch: UpdateEvent,
) -> QueueResult<events::Model> {
    let event = get_event(db, event_id).await?;
    if event.status == EventStatus::Closed {
        return Err(QueueError::EventNotActive {
            event_id,
            status: event.status,
        });
    }

    let mut active = event.into_active_model();

    if let Some(name) = patch.name {
        let name = normalize(Some(name))
            .ok_or_else(|| QueueError::Validation("Event name cannot be empty".to_string()))?;
        active.name = Set(name);
    }
    if let Some(date) = patch.date {
        active.date = Set(date);
    }
    if let Some(venue) = patch.venue {
        active.venue = Set(normalize(Some(venue)));
    }
    if let Some(code) = normalize_code(patch.code)? {
        ensure_code_free(db, &code, Some(event_id)).await?;
        active.code = Set(code);
    }
    if let Some(allow) = patch.allow_multiple_signups {
        active.allow_multiple_signups = Set(allow);
    }

    let updated = event_db::save_event(db, active).await?;

    info!(event_id, "Event updated");
    Ok(updated)
}

/// Check an event status change. Repeating the current status is a no-op.
pub fn check_event_transition(from: EventStatus, to: EventStatus) -> QueueResult<bool> {
    if from == to {
        return Ok(false);
    }
    if from.can_transition_to(to) {
        Ok(true)
    } else {
        Err(QueueError::InvalidEventTransition { from, to })
    }
}

/// Open or close an event.
pub async fn change_event_status(
    db: &DatabaseConnection,
    event_id: i32,
    to: EventStatus,
) -> QueueResult<events::Model> {
    // Locked so the change cannot interleave with a signup being admitted.
    let txn = db.begin().await?;
    let event = event_db::lock_queue(&txn, event_id)
        .await?
        .ok_or(QueueError::not_found("Event", event_id))?;
    let from = event.status;

    if !check_event_transition(from, to)? {
        txn.commit().await?;
        return Ok(event);
    }

    let mut active = event.into_active_model();
    active.status = Set(to);
    let updated = event_db::save_event(&txn, active).await?;
    txn.commit().await?;

    info!(event_id, "Event moved from {from} to {to}");
    Ok(updated)
}

/// Delete an event and, through the foreign key, all of its signups.
pub async fn delete_event(db: &DatabaseConnection, event_id: i32) -> QueueResult<()> {
    let result = event_db::delete_event(db, event_id).await?;
    if result.rows_affected == 0 {
        return Err(QueueError::not_found("Event", event_id));
    }

    info!(event_id, "Event deleted");
    Ok(())
}
