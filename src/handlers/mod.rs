pub mod auth;
pub mod events;
pub mod queue;
pub mod signups;
pub mod songs;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Host login ──
    cfg.service(
        web::resource("/admin/auth")
            .route(web::post().to(auth::login))
            .route(web::get().to(auth::check)),
    );

    // ── Event routes (writes require a host token) ──
    cfg.service(
        web::scope("/events")
            .route("", web::get().to(events::get_events))
            .route("", web::post().to(events::create_event))
            .route("/code/{code}", web::get().to(events::get_event_by_code))
            .route("/{id}", web::get().to(events::get_event))
            .route("/{id}", web::put().to(events::update_event))
            .route("/{id}", web::delete().to(events::delete_event))
            .route("/{id}/status", web::put().to(events::update_status))
            .route("/{id}/signups", web::get().to(queue::list_signups))
            .route("/{id}/queue", web::get().to(queue::active_order))
            .route("/{id}/queue/reorder", web::post().to(queue::reorder))
            .route("/{id}/queue/advance", web::post().to(queue::advance))
            .route("/{id}/board", web::get().to(queue::get_board))
            .route("/{id}/me", web::get().to(queue::my_signups))
            .route("/{id}/requests", web::get().to(queue::pending_requests)),
    );

    // ── Signup routes (devices own their signups, the host drives status) ──
    cfg.service(
        web::scope("/signups")
            .route("", web::post().to(signups::create_signup))
            .route("/{id}", web::get().to(signups::get_signup))
            .route("/{id}", web::patch().to(signups::edit_signup))
            .route("/{id}", web::delete().to(signups::cancel_signup))
            .route("/{id}/status", web::put().to(signups::update_status))
            .route("/{id}/request", web::put().to(signups::review_request))
            .route("/{id}/host-notes", web::put().to(signups::update_host_notes)),
    );

    // ── Song library ──
    cfg.service(
        web::scope("/songs")
            .route("", web::get().to(songs::get_songs))
            .route("", web::post().to(songs::create_song))
            .route("/{id}", web::get().to(songs::get_song))
            .route("/{id}", web::patch().to(songs::update_song))
            .route("/{id}", web::delete().to(songs::delete_song)),
    );
}
