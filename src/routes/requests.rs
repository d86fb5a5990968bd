use actix_session::Session;
use actix_web::{http::StatusCode, web, HttpResponse};
use chrono::{NaiveDate, Utc};

use crate::core::MatchResult;
use crate::error::RegistryError;
use crate::models::{BloodRequest, BloodRequestForm};
use crate::routes::flash::{push_flash, take_flashes, Flash, FlashLevel};
use crate::routes::{failure_status, html, redirect_home, AppState};
use crate::services::{NotificationReport, StoreError};
use crate::views;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/request", web::get().to(request_form))
        .route("/request", web::post().to(submit_request));
}

/// Validate and persist a blood request
pub async fn create_request(
    state: &AppState,
    form: BloodRequestForm,
) -> Result<BloodRequest, RegistryError> {
    let new_request = form.into_new_request()?;
    let request = state.store.insert_request(&new_request).await?;
    Ok(request)
}

/// Eligible donors for a stored request
///
/// The store pre-selects available donors by exact blood group and city;
/// the matcher re-checks those constraints and applies eligibility.
pub async fn find_matches(
    state: &AppState,
    request: &BloodRequest,
    today: NaiveDate,
) -> Result<MatchResult, StoreError> {
    let candidates = state
        .store
        .find_candidates(request.blood_group_needed, &request.city)
        .await?;

    Ok(state.matcher.find_matches(request, candidates, today))
}

/// Run the one matching pass of a new request and notify the matches
pub async fn match_and_notify(
    state: &AppState,
    request: &BloodRequest,
    today: NaiveDate,
) -> Result<NotificationReport, StoreError> {
    let result = find_matches(state, request, today).await?;

    tracing::info!(
        "Request {} matched {} of {} candidates",
        request.id,
        result.matches.len(),
        result.total_candidates
    );

    Ok(state.notifier.notify(&result.matches, request).await)
}

/// Blood request form
///
/// GET /request
async fn request_form(session: Session) -> HttpResponse {
    let form = BloodRequestForm {
        units_required: "1".to_string(),
        ..BloodRequestForm::default()
    };
    html(
        StatusCode::OK,
        views::request_page(&form, None, &take_flashes(&session)),
    )
}

/// Blood request submit
///
/// POST /request
///
/// The request is committed before matching starts; a failure while
/// matching is reported but does not undo the request.
async fn submit_request(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<BloodRequestForm>,
) -> HttpResponse {
    let form = form.into_inner();

    let request = match create_request(&state, form.clone()).await {
        Ok(request) => request,
        Err(e) => {
            match &e {
                RegistryError::Validation(msg) => {
                    tracing::info!("Rejected blood request: {}", msg)
                }
                RegistryError::Storage(err) => {
                    tracing::error!("Failed to store blood request: {}", err)
                }
            }
            return html(
                failure_status(&e),
                views::request_page(&form, Some(&e.user_message()), &take_flashes(&session)),
            );
        }
    };

    tracing::info!(
        "Received blood request {} ({} x{} in {})",
        request.id,
        request.blood_group_needed,
        request.units_required,
        request.city
    );

    let today = Utc::now().date_naive();
    match match_and_notify(&state, &request, today).await {
        Ok(_) => push_flash(
            &session,
            Flash::new(
                FlashLevel::Success,
                "Request submitted. We will notify eligible donors.",
            ),
        ),
        Err(e) => {
            tracing::error!("Failed to match donors for request {}: {}", request.id, e);
            push_flash(
                &session,
                Flash::new(
                    FlashLevel::Danger,
                    "Request saved, but donors could not be matched right now.",
                ),
            );
        }
    }

    redirect_home()
}
