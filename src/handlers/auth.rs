use actix_web::{Error, HttpResponse, Responder, web};
use serde::Deserialize;

use crate::auth::middleware::{HostAuth, HostSession};

#[derive(Debug, Deserialize)]
pub struct HostLogin {
    pub passcode: String,
}

/// POST /api/admin/auth — trade the host passcode for a session token.
pub async fn login(
    host_auth: web::Data<HostAuth>,
    body: web::Json<HostLogin>,
) -> Result<HttpResponse, Error> {
    let token = host_auth.login(&body.passcode)?;
    tracing::info!("Host logged in");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "token": token,
        "expires_in": host_auth.token_ttl.as_secs(),
    })))
}

/// GET /api/admin/auth — check whether the caller holds a valid host token.
pub async fn check(host: HostSession) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "authenticated": true,
        "expires_at": host.0.exp,
    }))
}
