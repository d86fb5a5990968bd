//! One-shot messages carried across a redirect in the session cookie.

use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::Key;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

pub(crate) const FLASH_KEY: &str = "_flashes";
pub const SESSION_COOKIE: &str = "redconnect_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Queue a message for the next rendered page
pub fn push_flash(session: &Session, flash: Flash) {
    let mut pending = match session.get::<Vec<Flash>>(FLASH_KEY) {
        Ok(pending) => pending.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Discarding unreadable flash messages: {}", e);
            Vec::new()
        }
    };
    pending.push(flash);

    if let Err(e) = session.insert(FLASH_KEY, pending) {
        tracing::warn!("Failed to store flash message: {}", e);
    }
}

/// Remove and return every queued message
pub fn take_flashes(session: &Session) -> Vec<Flash> {
    let pending = session.get::<Vec<Flash>>(FLASH_KEY).unwrap_or_else(|e| {
        tracing::warn!("Discarding unreadable flash messages: {}", e);
        None
    });

    match pending {
        Some(flashes) => {
            session.remove(FLASH_KEY);
            flashes
        }
        None => Vec::new(),
    }
}

/// Derive the cookie signing key from the configured secret
///
/// Any secret length is accepted; SHA-512 stretches it to the 64 bytes the
/// cookie key needs.
pub fn session_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Cookie session holding nothing but flash messages
pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_string())
        .cookie_path("/".to_string())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test as actix_test;
    use actix_web::{web, App, HttpResponse};

    #[test]
    fn test_session_key_is_deterministic() {
        let a = session_key("dev-secret-key");
        let b = session_key("dev-secret-key");
        let c = session_key("other");

        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }

    #[actix_web::test]
    async fn test_flash_survives_one_request() {
        let app = actix_test::init_service(
            App::new()
                .wrap(session_middleware(Key::generate(), false))
                .route(
                    "/set",
                    web::get().to(|session: Session| async move {
                        push_flash(&session, Flash::new(FlashLevel::Success, "saved"));
                        HttpResponse::Ok().finish()
                    }),
                )
                .route(
                    "/take",
                    web::get().to(|session: Session| async move {
                        let flashes = take_flashes(&session);
                        let text = flashes
                            .iter()
                            .map(|f| f.message.clone())
                            .collect::<Vec<_>>()
                            .join(",");
                        HttpResponse::Ok().body(text)
                    }),
                ),
        )
        .await;

        let set_res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .expect("session cookie set")
            .into_owned();

        let take_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/take").cookie(cookie).to_request(),
        )
        .await;
        let body = actix_test::read_body(take_res).await;

        assert_eq!(body, "saved");
    }
}
