// Route exports
pub mod donors;
pub mod flash;
pub mod pages;
pub mod requests;

use actix_web::{error, http::header::ContentType, http::StatusCode, web, HttpResponse};
use std::sync::Arc;

use crate::core::Matcher;
use crate::error::RegistryError;
use crate::services::{Notifier, RegistryStore};
use crate::views;

/// Application state shared across all handlers
///
/// Built once at startup and cloned into every worker.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RegistryStore>,
    pub matcher: Matcher,
    pub notifier: Arc<Notifier>,
}

impl AppState {
    pub fn new(store: RegistryStore, matcher: Matcher, notifier: Notifier) -> Self {
        Self {
            store: Arc::new(store),
            matcher,
            notifier: Arc::new(notifier),
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(handle_form_payload_error))
        .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
        .configure(pages::configure)
        .configure(donors::configure)
        .configure(requests::configure);
}

/// HTML error page for requests that never reach a handler
#[derive(Debug)]
pub struct PageError {
    pub title: String,
    pub message: String,
    pub status_code: StatusCode,
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl std::error::Error for PageError {}

impl error::ResponseError for PageError {
    fn status_code(&self) -> StatusCode {
        self.status_code
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code)
            .content_type(ContentType::html())
            .body(views::error_page(&self.title, &self.message))
    }
}

/// Handle undecodable form bodies
pub fn handle_form_payload_error(err: error::UrlencodedError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Form payload error on {}: {}", req.path(), err);
    PageError {
        title: "Invalid form".to_string(),
        message: format!("The submitted form could not be read: {}", err),
        status_code: StatusCode::BAD_REQUEST,
    }
    .into()
}

/// Handle undecodable query strings
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    PageError {
        title: "Invalid query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: StatusCode::BAD_REQUEST,
    }
    .into()
}

/// Page shown when a read from the store fails
pub(crate) fn storage_failure_page() -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type(ContentType::html())
        .body(views::error_page(
            "Something went wrong",
            "The registry is unavailable right now, please try again later.",
        ))
}

/// HTTP status for a failed submission
pub(crate) fn failure_status(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RegistryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body)
}

pub(crate) fn redirect_home() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((actix_web::http::header::LOCATION, "/"))
        .finish()
}
