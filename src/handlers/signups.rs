use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::{DeviceId, HostSession};
use crate::cache::BoardCache;
use crate::error::QueueError;
use crate::models::signups::{
    CreateSignup, EditSignup, PublicSignup, ReviewRequest, SignupPatch, UpdateHostNotes,
    UpdateSignupStatus,
};
use crate::queue::{admission, board, requests, retry_on_conflict, status};

/// POST /api/signups — join an event's queue from a device.
pub async fn create_signup(
    device: DeviceId,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<BoardCache>,
    body: web::Json<CreateSignup>,
) -> Result<HttpResponse, QueueError> {
    let input = body.into_inner();
    let event_id = input.event_id;

    let created = admission::create_signup(db.get_ref(), &device.0, input).await?;
    cache.invalidate(event_id).await;

    Ok(HttpResponse::Created().json(created))
}

/// GET /api/signups/{id} — a single signup with its song.
pub async fn get_signup(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, QueueError> {
    let signup = board::get_signup(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(signup))
}

/// PATCH /api/signups/{id} — the owning device edits its waiting signup.
pub async fn edit_signup(
    device: DeviceId,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<BoardCache>,
    path: web::Path<i32>,
    body: web::Json<EditSignup>,
) -> Result<HttpResponse, QueueError> {
    let patch = SignupPatch::try_from(body.into_inner())?;

    let updated = admission::edit_signup(db.get_ref(), path.into_inner(), &device.0, patch).await?;
    cache.invalidate(updated.event_id).await;

    Ok(HttpResponse::Ok().json(PublicSignup::from(updated)))
}

/// DELETE /api/signups/{id} — the owning device withdraws its signup.
pub async fn cancel_signup(
    device: DeviceId,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<BoardCache>,
    path: web::Path<i32>,
) -> Result<HttpResponse, QueueError> {
    let db = db.get_ref();
    let id = path.into_inner();
    let device_id = device.0.as_str();

    let cancelled = retry_on_conflict(move || admission::cancel_signup(db, id, device_id)).await?;
    cache.invalidate(cancelled.event_id).await;

    Ok(HttpResponse::Ok().json(PublicSignup::from(cancelled)))
}

/// PUT /api/signups/{id}/status — host moves a signup through the queue.
pub async fn update_status(
    _host: HostSession,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<BoardCache>,
    path: web::Path<i32>,
    body: web::Json<UpdateSignupStatus>,
) -> Result<HttpResponse, QueueError> {
    let db = db.get_ref();
    let id = path.into_inner();
    let to = body.status;

    let updated = retry_on_conflict(move || status::change_status(db, id, to)).await?;
    cache.invalidate(updated.event_id).await;

    Ok(HttpResponse::Ok().json(updated))
}

/// PUT /api/signups/{id}/request — host approves or declines a song request.
pub async fn review_request(
    _host: HostSession,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<BoardCache>,
    path: web::Path<i32>,
    body: web::Json<ReviewRequest>,
) -> Result<HttpResponse, QueueError> {
    let ReviewRequest { decision, reason } = body.into_inner();

    let updated =
        requests::review_request(db.get_ref(), path.into_inner(), decision, reason).await?;
    cache.invalidate(updated.event_id).await;

    Ok(HttpResponse::Ok().json(updated))
}

/// PUT /api/signups/{id}/host-notes — host's private notes on a performer.
pub async fn update_host_notes(
    _host: HostSession,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<BoardCache>,
    path: web::Path<i32>,
    body: web::Json<UpdateHostNotes>,
) -> Result<HttpResponse, QueueError> {
    let updated = admission::set_host_notes(
        db.get_ref(),
        path.into_inner(),
        body.into_inner().host_notes,
    )
    .await?;
    cache.invalidate(updated.event_id).await;

    Ok(HttpResponse::Ok().json(updated))
}
