use actix_session::Session;
use actix_web::{http::StatusCode, web, HttpResponse};
use chrono::{NaiveDate, Utc};

use crate::error::RegistryError;
use crate::models::{Donor, DonorForm, SearchQuery};
use crate::routes::flash::{push_flash, take_flashes, Flash, FlashLevel};
use crate::routes::{failure_status, html, redirect_home, storage_failure_page, AppState};
use crate::views;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/donor/register", web::get().to(registration_form))
        .route("/donor/register", web::post().to(register_donor))
        .route("/donors", web::get().to(find_donors));
}

/// Validate and persist a donor registration
///
/// Validation runs before anything is written, so a rejected form never
/// leaves a row behind.
pub async fn submit_donor(
    state: &AppState,
    form: DonorForm,
    today: NaiveDate,
) -> Result<Donor, RegistryError> {
    let new_donor = form.into_new_donor(today)?;
    let donor = state.store.insert_donor(&new_donor).await?;
    Ok(donor)
}

/// Donor registration form
///
/// GET /donor/register
async fn registration_form(session: Session) -> HttpResponse {
    html(
        StatusCode::OK,
        views::donor_register_page(&DonorForm::default(), None, &take_flashes(&session)),
    )
}

/// Donor registration submit
///
/// POST /donor/register
async fn register_donor(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<DonorForm>,
) -> HttpResponse {
    let form = form.into_inner();
    let today = Utc::now().date_naive();

    match submit_donor(&state, form.clone(), today).await {
        Ok(donor) => {
            tracing::info!(
                "Registered donor {} ({} in {})",
                donor.id,
                donor.blood_group,
                donor.city
            );
            push_flash(
                &session,
                Flash::new(FlashLevel::Success, "Thank you for registering as a donor!"),
            );
            redirect_home()
        }
        Err(e) => {
            match &e {
                RegistryError::Validation(msg) => {
                    tracing::info!("Rejected donor registration: {}", msg)
                }
                RegistryError::Storage(err) => {
                    tracing::error!("Failed to store donor registration: {}", err)
                }
            }
            html(
                failure_status(&e),
                views::donor_register_page(&form, Some(&e.user_message()), &take_flashes(&session)),
            )
        }
    }
}

/// Search available, eligible donors
///
/// GET /donors?blood_group={group}&city={text}
///
/// Blood group must match exactly; city is a case-insensitive substring.
async fn find_donors(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    let query = query.into_inner();
    let flashes = take_flashes(&session);

    let criteria = match query.criteria() {
        Ok(criteria) => criteria,
        Err(e) => {
            return html(
                failure_status(&e),
                views::find_donors_page(&[], &query, Some(&e.user_message()), &flashes),
            );
        }
    };

    let candidates = match state.store.available_donors(criteria.blood_group).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to search donors: {}", e);
            return storage_failure_page();
        }
    };

    let today = Utc::now().date_naive();
    let result = state.matcher.search(&criteria, candidates, today);

    tracing::debug!(
        "Donor search returned {} of {} available donors",
        result.matches.len(),
        result.total_candidates
    );

    html(
        StatusCode::OK,
        views::find_donors_page(&result.matches, &query, None, &flashes),
    )
}
