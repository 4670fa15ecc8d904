use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::DbErr;
use thiserror::Error;

use crate::models::events::EventStatus;
use crate::models::signups::SignupStatus;

pub type QueueResult<T> = Result<T, QueueError>;

/// Every way a queue operation can be refused. All variants are returned as
/// typed results at the operation boundary.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("{0}")]
    Validation(String),
    #[error("Event {event_id} is {status}, not active")]
    EventNotActive { event_id: i32, status: EventStatus },
    #[error("You already have an active signup for this event")]
    DuplicateActiveSignup,
    #[error("Song {0} not found")]
    SongNotFound(i32),
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i32 },
    #[error("No event uses the code {0}")]
    UnknownCode(String),
    #[error("Not authorized to {0}")]
    NotAuthorized(&'static str),
    #[error("Cannot {action} a signup that is {current}")]
    InvalidState {
        current: SignupStatus,
        action: &'static str,
    },
    #[error("Cannot move a signup from {from} to {to}")]
    InvalidTransition { from: SignupStatus, to: SignupStatus },
    #[error("{}", occupancy_message(.status, .holder))]
    OccupancyConflict {
        status: SignupStatus,
        holder: Option<i32>,
    },
    #[error("Signup {0} has no song request")]
    NotARequest(i32),
    #[error("Song {0} is still referenced by signups")]
    SongInUse(i32),
    #[error("Cannot move an event from {from} to {to}")]
    InvalidEventTransition { from: EventStatus, to: EventStatus },
    #[error("Concurrent update detected: {0}")]
    Conflict(String),
    #[error(transparent)]
    Db(#[from] DbErr),
}

fn occupancy_message(status: &SignupStatus, holder: &Option<i32>) -> String {
    match holder {
        Some(id) => format!("Signup {id} is already {status}"),
        None => format!("Another signup is already {status}"),
    }
}

impl QueueError {
    pub const fn not_found(resource: &'static str, id: i32) -> Self {
        Self::NotFound { resource, id }
    }

    /// Stable machine-readable kind, sent alongside the message.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::EventNotActive { .. } => "event_not_active",
            Self::DuplicateActiveSignup => "duplicate_active_signup",
            Self::SongNotFound(_) => "song_not_found",
            Self::NotFound { .. } | Self::UnknownCode(_) => "not_found",
            Self::NotAuthorized(_) => "not_authorized",
            Self::InvalidState { .. } => "invalid_state",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::OccupancyConflict { .. } => "occupancy_conflict",
            Self::NotARequest(_) => "not_a_request",
            Self::SongInUse(_) => "song_in_use",
            Self::InvalidEventTransition { .. } => "invalid_event_transition",
            Self::Conflict(_) => "conflict",
            Self::Db(_) => "internal_error",
        }
    }
}

impl ResponseError for QueueError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::SongNotFound(_) | Self::NotARequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotAuthorized(_) => StatusCode::FORBIDDEN,
            Self::NotFound { .. } | Self::UnknownCode(_) => StatusCode::NOT_FOUND,
            Self::EventNotActive { .. }
            | Self::DuplicateActiveSignup
            | Self::InvalidState { .. }
            | Self::InvalidTransition { .. }
            | Self::OccupancyConflict { .. }
            | Self::SongInUse(_)
            | Self::InvalidEventTransition { .. }
            | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::Db(e) => format!("Database error: {e}"),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": message,
            "code": self.code(),
        }))
    }
}
