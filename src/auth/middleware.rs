use actix_web::FromRequest;
use actix_web::{Error, HttpRequest, dev::Payload, web};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::time::Duration;

use crate::auth::jwt::{self, HostClaims};

/// Cookie carrying the device identity set by the signup page.
pub const DEVICE_COOKIE: &str = "device_id";
/// Header alternative to the cookie for non-browser clients.
pub const DEVICE_HEADER: &str = "X-Device-Id";

/// Host gate settings shared through Actix app data.
#[derive(Clone)]
pub struct HostAuth {
    pub passcode: String,
    pub secret: String,
    pub token_ttl: Duration,
}

impl HostAuth {
    /// Exchange the host passcode for a signed session token.
    pub fn login(&self, passcode: &str) -> Result<String, Error> {
        if passcode != self.passcode {
            return Err(actix_web::error::ErrorUnauthorized("Invalid passcode"));
        }

        jwt::issue_token(&self.secret, self.token_ttl)
            .map_err(actix_web::error::ErrorInternalServerError)
    }
}

/// A request made by the host, proven by a valid Bearer token.
pub struct HostSession(pub HostClaims);

impl FromRequest for HostSession {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    actix_web::error::ErrorUnauthorized("Missing Authorization header")
                })?;

            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                actix_web::error::ErrorUnauthorized("Authorization header must be: Bearer <token>")
            })?;

            let host_auth = req.app_data::<web::Data<HostAuth>>().ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("Host auth not configured")
            })?;

            let claims = jwt::validate_token(token, &host_auth.secret)
                .map_err(|e| actix_web::error::ErrorUnauthorized(format!("Invalid token: {e}")))?;

            Ok(HostSession(claims))
        })
    }
}

/// The anonymous identity of the performer's device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId(pub String);

impl DeviceId {
    fn from_request_parts(req: &HttpRequest) -> Option<Self> {
        let from_cookie = req.cookie(DEVICE_COOKIE).map(|c| c.value().to_string());
        let from_header = || {
            req.headers()
                .get(DEVICE_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        from_cookie
            .or_else(from_header)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(DeviceId)
    }
}

impl FromRequest for DeviceId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_request_parts(req).ok_or_else(|| {
            actix_web::error::ErrorBadRequest(format!(
                "Missing device identity ({DEVICE_COOKIE} cookie or {DEVICE_HEADER} header)"
            ))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    #[test]
    fn device_id_prefers_the_cookie() {
        let req = TestRequest::default()
            .cookie(Cookie::new(DEVICE_COOKIE, "cookie-device"))
            .insert_header((DEVICE_HEADER, "header-device"))
            .to_http_request();
        assert_eq!(
            DeviceId::from_request_parts(&req),
            Some(DeviceId("cookie-device".into()))
        );
    }

    #[test]
    fn device_id_falls_back_to_the_header() {
        let req = TestRequest::default()
            .insert_header((DEVICE_HEADER, " header-device "))
            .to_http_request();
        assert_eq!(
            DeviceId::from_request_parts(&req),
            Some(DeviceId("header-device".into()))
        );

        let bare = TestRequest::default().to_http_request();
        assert_eq!(DeviceId::from_request_parts(&bare), None);
    }

    #[test]
    fn login_checks_the_passcode() {
        let auth = HostAuth {
            passcode: "stage-left".into(),
            secret: "test-secret".into(),
            token_ttl: Duration::from_secs(60),
        };

        assert!(auth.login("wrong").is_err());
        let token = auth.login("stage-left").unwrap();
        assert!(jwt::validate_token(&token, "test-secret").is_ok());
    }
}
