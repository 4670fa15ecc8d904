//! Shared setup for the integration tests: an in-memory SQLite database with
//! the real migrations applied, plus small seed helpers.
#![allow(dead_code)]

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

use openmic_queue::models::events::{self, CreateEvent, EventStatus};
use openmic_queue::models::signups::{CreateSignup, PerformanceType, SignupCreated};
use openmic_queue::models::songs::{self, CreateSong};
use openmic_queue::queue::{admission, lifecycle, library};

/// Fresh database per test. One connection, since every SQLite in-memory
/// connection is its own database.
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn new_device() -> String {
    Uuid::new_v4().to_string()
}

pub async fn draft_event(db: &DatabaseConnection, allow_multiple_signups: bool) -> events::Model {
    lifecycle::create_event(
        db,
        CreateEvent {
            name: "Tuesday Open Mic".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            venue: Some("The Back Room".to_string()),
            code: None,
            allow_multiple_signups: Some(allow_multiple_signups),
        },
    )
    .await
    .expect("Failed to create event")
}

pub async fn active_event(db: &DatabaseConnection) -> events::Model {
    let event = draft_event(db, false).await;
    lifecycle::change_event_status(db, event.id, EventStatus::Active)
        .await
        .expect("Failed to open event")
}

pub async fn song(db: &DatabaseConnection, title: &str, artist: &str) -> songs::Model {
    library::create_song(
        db,
        CreateSong {
            title: title.to_string(),
            artist: artist.to_string(),
            key: Some("E".to_string()),
            tempo: None,
            difficulty: None,
            notes: None,
            tags: None,
        },
    )
    .await
    .expect("Failed to create song")
}

pub fn solo(event_id: i32, name: &str) -> CreateSignup {
    CreateSignup {
        event_id,
        performer_name: name.to_string(),
        kind: PerformanceType::Solo,
        song_id: None,
        request_text: None,
        notes: None,
    }
}

pub fn with_song(event_id: i32, name: &str, song_id: i32) -> CreateSignup {
    CreateSignup {
        kind: PerformanceType::WithBand,
        song_id: Some(song_id),
        ..solo(event_id, name)
    }
}

pub fn with_request(event_id: i32, name: &str, request: &str) -> CreateSignup {
    CreateSignup {
        kind: PerformanceType::WithBand,
        request_text: Some(request.to_string()),
        ..solo(event_id, name)
    }
}

/// Sign a performer up from a fresh device.
pub async fn sign_up(db: &DatabaseConnection, input: CreateSignup) -> SignupCreated {
    admission::create_signup(db, &new_device(), input)
        .await
        .expect("Failed to create signup")
}
