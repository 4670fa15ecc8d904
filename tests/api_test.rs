//! HTTP surface tests: routing, the host gate and error bodies.
//!
//! Run with: `cargo test --test api_test`
mod common;

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use common::*;
use openmic_queue::auth::jwt::issue_token;
use openmic_queue::auth::middleware::{DEVICE_HEADER, HostAuth};
use openmic_queue::cache::BoardCache;
use openmic_queue::handlers;

const PASSCODE: &str = "break-a-leg";
const SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn host_auth() -> HostAuth {
    HostAuth {
        passcode: PASSCODE.to_string(),
        secret: SECRET.to_string(),
        token_ttl: Duration::from_secs(3600),
    }
}

fn bearer() -> (&'static str, String) {
    let token = issue_token(SECRET, Duration::from_secs(600)).expect("Token should sign");
    ("Authorization", format!("Bearer {token}"))
}

fn assert_no_private_fields(entry: &Value) {
    assert!(entry.get("device_id").is_none(), "device id exposed: {entry}");
    assert!(entry.get("host_notes").is_none(), "host notes exposed: {entry}");
}

macro_rules! app {
    ($db:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($db.clone()))
                .app_data(web::Data::new(BoardCache::new(Duration::from_secs(60))))
                .app_data(web::Data::new(host_auth()))
                .service(web::scope("/api").configure(handlers::init_routes)),
        )
        .await
    };
}

#[actix_web::test]
async fn host_routes_require_a_token() {
    let db = setup_db().await;
    let app = app!(db);

    let req = test::TestRequest::post()
        .uri("/api/events")
        .set_json(json!({ "name": "No Token Night", "date": "2026-10-20" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/events")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .set_json(json!({ "name": "Bad Token Night", "date": "2026-10-20" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn wrong_passcode_is_refused() {
    let db = setup_db().await;
    let app = app!(db);

    let req = test::TestRequest::post()
        .uri("/api/admin/auth")
        .set_json(json!({ "passcode": "open-sesame" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn host_runs_an_event_over_http() {
    let db = setup_db().await;
    let app = app!(db);

    // Log in.
    let req = test::TestRequest::post()
        .uri("/api/admin/auth")
        .set_json(json!({ "passcode": PASSCODE }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().expect("token in response").to_string();
    let bearer = ("Authorization", format!("Bearer {token}"));

    let req = test::TestRequest::get()
        .uri("/api/admin/auth")
        .insert_header(bearer.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["authenticated"], true);

    // Create and open an event.
    let req = test::TestRequest::post()
        .uri("/api/events")
        .insert_header(bearer.clone())
        .set_json(json!({ "name": "Friday Jam", "date": "2026-10-23", "code": "friday" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let event: Value = test::read_body_json(resp).await;
    let event_id = event["id"].as_i64().expect("event id");
    assert_eq!(event["code"], "FRIDAY");
    assert_eq!(event["status"], "draft");

    let req = test::TestRequest::put()
        .uri(&format!("/api/events/{event_id}/status"))
        .insert_header(bearer.clone())
        .set_json(json!({ "status": "active" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // A device signs up, then tries again.
    let signup_body = json!({
        "event_id": event_id,
        "performer_name": "Nina",
        "type": "with_band",
        "request_text": "Valerie",
    });
    let req = test::TestRequest::post()
        .uri("/api/signups")
        .insert_header((DEVICE_HEADER, "device-nina"))
        .set_json(&signup_body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["position"], 1);
    assert_eq!(created["request_status"], "pending");
    let signup_id = created["id"].as_i64().expect("signup id");

    let req = test::TestRequest::post()
        .uri("/api/signups")
        .insert_header((DEVICE_HEADER, "device-nina"))
        .set_json(&signup_body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let error: Value = test::read_body_json(resp).await;
    assert_eq!(error["code"], "duplicate_active_signup");

    // The host approves the request and advances the show twice.
    let req = test::TestRequest::put()
        .uri(&format!("/api/signups/{signup_id}/request"))
        .insert_header(bearer.clone())
        .set_json(json!({ "decision": "approved" }))
        .to_request();
    let reviewed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reviewed["request_status"], "approved");

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri(&format!("/api/events/{event_id}/queue/advance"))
            .insert_header(bearer.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{event_id}/board"))
        .to_request();
    let board: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(board["now_performing"]["id"], signup_id);
    assert_eq!(board["now_performing"]["type"], "with_band");
    assert!(board["on_deck"].is_null());

    // On stage, the performer can no longer cancel.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/signups/{signup_id}"))
        .insert_header((DEVICE_HEADER, "device-nina"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let error: Value = test::read_body_json(resp).await;
    assert_eq!(error["code"], "invalid_state");
}

#[actix_web::test]
async fn signups_need_a_device_identity() {
    let db = setup_db().await;
    let event = active_event(&db).await;
    let app = app!(db);

    let req = test::TestRequest::post()
        .uri("/api/signups")
        .set_json(json!({
            "event_id": event.id,
            "performer_name": "Otto",
            "type": "solo",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn missing_resources_are_404() {
    let db = setup_db().await;
    let app = app!(db);

    let req = test::TestRequest::get().uri("/api/signups/77").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error: Value = test::read_body_json(resp).await;
    assert_eq!(error["code"], "not_found");

    let req = test::TestRequest::get()
        .uri("/api/events/code/NOPE42")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn public_views_hide_devices_and_host_notes() {
    let db = setup_db().await;
    let event = active_event(&db).await;
    let app = app!(db);

    for (device, name) in [("device-lea", "Lea"), ("device-max", "Max")] {
        let req = test::TestRequest::post()
            .uri("/api/signups")
            .insert_header((DEVICE_HEADER, device))
            .set_json(json!({ "event_id": event.id, "performer_name": name, "type": "solo" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri(&format!("/api/events/{}/queue/advance", event.id))
        .insert_header(bearer())
        .to_request();
    let advanced: Value = test::call_and_read_body_json(&app, req).await;
    let lea_id = advanced["on_deck"]["id"].as_i64().expect("on deck id");

    let req = test::TestRequest::put()
        .uri(&format!("/api/signups/{lea_id}/host-notes"))
        .insert_header(bearer())
        .set_json(json!({ "host_notes": "first time on stage" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{}/queue", event.id))
        .to_request();
    let queue: Value = test::call_and_read_body_json(&app, req).await;
    let entries = queue.as_array().expect("queue is a list");
    assert_eq!(entries.len(), 2);
    entries.iter().for_each(assert_no_private_fields);

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{}/board", event.id))
        .to_request();
    let board: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(board["on_deck"]["performer_name"], "Lea");
    assert_no_private_fields(&board["on_deck"]);
    board["up_next"]
        .as_array()
        .expect("up next is a list")
        .iter()
        .for_each(assert_no_private_fields);

    let req = test::TestRequest::get()
        .uri(&format!("/api/signups/{lea_id}"))
        .to_request();
    let signup: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(signup["performer_name"], "Lea");
    assert_no_private_fields(&signup);

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{}/me", event.id))
        .insert_header((DEVICE_HEADER, "device-lea"))
        .to_request();
    let mine: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(mine["ahead"], 0);
    mine["signups"]
        .as_array()
        .expect("own signups are a list")
        .iter()
        .for_each(assert_no_private_fields);

    // The full listing is for the host.
    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{}/signups", event.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{}/signups", event.id))
        .insert_header(bearer())
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    let lea = listed
        .as_array()
        .expect("listing is a list")
        .iter()
        .find(|s| s["id"] == lea_id)
        .expect("Lea is listed");
    assert_eq!(lea["device_id"], "device-lea");
    assert_eq!(lea["host_notes"], "first time on stage");
}

#[actix_web::test]
async fn host_notes_refresh_the_cached_board() {
    let db = setup_db().await;
    let event = active_event(&db).await;
    let signup = sign_up(&db, solo(event.id, "Noor")).await;
    let app = app!(db);

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{}/board", event.id))
        .to_request();
    let before: Value = test::call_and_read_body_json(&app, req).await;
    let version = before["queue_version"].as_i64().expect("queue version");

    let req = test::TestRequest::put()
        .uri(&format!("/api/signups/{}/host-notes", signup.id))
        .insert_header(bearer())
        .set_json(json!({ "host_notes": "bring a capo" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{}/board", event.id))
        .to_request();
    let after: Value = test::call_and_read_body_json(&app, req).await;
    assert!(after["queue_version"].as_i64().expect("queue version") > version);
}

#[actix_web::test]
async fn host_edits_a_song() {
    let db = setup_db().await;
    let tune = song(&db, "Hallelujah", "Leonard Cohen").await;
    let app = app!(db);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/songs/{}", tune.id))
        .set_json(json!({ "artist": "Jeff Buckley" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/songs/{}", tune.id))
        .insert_header(bearer())
        .set_json(json!({ "artist": "Jeff Buckley", "difficulty": "hard" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["title"], "Hallelujah");
    assert_eq!(updated["artist"], "Jeff Buckley");
    assert_eq!(updated["difficulty"], "hard");
}
