use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::HostSession;
use crate::cache::BoardCache;
use crate::error::QueueError;
use crate::models::events::{CreateEvent, UpdateEvent, UpdateEventStatus};
use crate::queue::lifecycle;

/// GET /api/events — all events, newest first.
pub async fn get_events(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, QueueError> {
    let events = lifecycle::list_events(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(events))
}

/// GET /api/events/{id}
pub async fn get_event(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, QueueError> {
    let event = lifecycle::get_event(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(event))
}

/// GET /api/events/code/{code} — resolve a join code.
pub async fn get_event_by_code(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, QueueError> {
    let event = lifecycle::get_event_by_code(db.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(event))
}

/// POST /api/events — create a draft event (host only).
pub async fn create_event(
    _host: HostSession,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateEvent>,
) -> Result<HttpResponse, QueueError> {
    let event = lifecycle::create_event(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(event))
}

/// PUT /api/events/{id} — edit event details (host only).
pub async fn update_event(
    _host: HostSession,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<BoardCache>,
    path: web::Path<i32>,
    body: web::Json<UpdateEvent>,
) -> Result<HttpResponse, QueueError> {
    let event_id = path.into_inner();

    let event = lifecycle::update_event(db.get_ref(), event_id, body.into_inner()).await?;
    cache.invalidate(event_id).await;

    Ok(HttpResponse::Ok().json(event))
}

/// PUT /api/events/{id}/status — open or close an event (host only).
pub async fn update_status(
    _host: HostSession,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<BoardCache>,
    path: web::Path<i32>,
    body: web::Json<UpdateEventStatus>,
) -> Result<HttpResponse, QueueError> {
    let event_id = path.into_inner();

    let event = lifecycle::change_event_status(db.get_ref(), event_id, body.status).await?;
    cache.invalidate(event_id).await;

    Ok(HttpResponse::Ok().json(event))
}

/// DELETE /api/events/{id} — delete an event with its signups (host only).
pub async fn delete_event(
    _host: HostSession,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<BoardCache>,
    path: web::Path<i32>,
) -> Result<HttpResponse, QueueError> {
    let event_id = path.into_inner();

    lifecycle::delete_event(db.get_ref(), event_id).await?;
    cache.invalidate(event_id).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Event {event_id} deleted"),
    })))
}
