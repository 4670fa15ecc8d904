use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::HostSession;
use crate::error::QueueError;
use crate::models::songs::{CreateSong, UpdateSong};
use crate::queue::library;

/// GET /api/songs — the library, by artist then title.
pub async fn get_songs(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, QueueError> {
    let songs = library::list_songs(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(songs))
}

/// GET /api/songs/{id}
pub async fn get_song(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, QueueError> {
    let song = library::get_song(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(song))
}

/// POST /api/songs — add a song to the library (host only).
pub async fn create_song(
    _host: HostSession,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateSong>,
) -> Result<HttpResponse, QueueError> {
    let song = library::create_song(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(song))
}

/// PATCH /api/songs/{id} — edit library details (host only).
pub async fn update_song(
    _host: HostSession,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<UpdateSong>,
) -> Result<HttpResponse, QueueError> {
    let song = library::update_song(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(song))
}

/// DELETE /api/songs/{id} — remove an unused song (host only).
pub async fn delete_song(
    _host: HostSession,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, QueueError> {
    let id = path.into_inner();
    library::delete_song(db.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Song {id} deleted"),
    })))
}
