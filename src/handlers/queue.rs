use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::{DeviceId, HostSession};
use crate::cache::BoardCache;
use crate::error::QueueError;
use crate::models::signups::{PublicSignup, ReorderQueue};
use crate::queue::{board, ordering, requests, retry_on_conflict, status};

/// POST /api/events/{id}/queue/reorder — host sets the order of the waiting line.
pub async fn reorder(
    _host: HostSession,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<BoardCache>,
    path: web::Path<i32>,
    body: web::Json<ReorderQueue>,
) -> Result<HttpResponse, QueueError> {
    let event_id = path.into_inner();

    let waiting = ordering::reorder(db.get_ref(), event_id, &body.signup_ids).await?;
    cache.invalidate(event_id).await;

    Ok(HttpResponse::Ok().json(waiting))
}

/// POST /api/events/{id}/queue/advance — host moves the show on by one performer.
pub async fn advance(
    _host: HostSession,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<BoardCache>,
    path: web::Path<i32>,
) -> Result<HttpResponse, QueueError> {
    let db = db.get_ref();
    let event_id = path.into_inner();

    let outcome = retry_on_conflict(move || status::advance(db, event_id)).await?;
    cache.invalidate(event_id).await;

    Ok(HttpResponse::Ok().json(outcome))
}

/// GET /api/events/{id}/queue — active signups in performance order.
pub async fn active_order(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, QueueError> {
    let order: Vec<PublicSignup> = ordering::active_position_order(db.get_ref(), path.into_inner())
        .await?
        .into_iter()
        .map(PublicSignup::from)
        .collect();
    Ok(HttpResponse::Ok().json(order))
}

/// GET /api/events/{id}/signups — every signup of the event, in queue order.
pub async fn list_signups(
    _host: HostSession,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, QueueError> {
    let signups = board::list_signups(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(signups))
}

/// GET /api/events/{id}/board — the band view, polled by every screen.
pub async fn get_board(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<BoardCache>,
    path: web::Path<i32>,
) -> Result<HttpResponse, QueueError> {
    let board = cache.get_or_load(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(board))
}

/// GET /api/events/{id}/me — the calling device's signups and place in line.
pub async fn my_signups(
    device: DeviceId,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, QueueError> {
    let view = board::device_view(db.get_ref(), path.into_inner(), &device.0).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// GET /api/events/{id}/requests — song requests awaiting a decision.
pub async fn pending_requests(
    _host: HostSession,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, QueueError> {
    let pending = requests::pending_requests(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(pending))
}
