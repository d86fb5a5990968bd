use actix_session::Session;
use actix_web::{http::StatusCode, web, HttpResponse};
use chrono::Utc;

use crate::models::{DashboardStats, HomeSummary};
use crate::routes::flash::take_flashes;
use crate::routes::{html, storage_failure_page, AppState};
use crate::services::StoreError;
use crate::views;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/dashboard", web::get().to(dashboard));
}

async fn home_summary(state: &AppState) -> Result<HomeSummary, StoreError> {
    Ok(HomeSummary {
        total_donors: state.store.count_donors().await?,
        lives_saved: state.store.count_requests().await?,
        cities_served: state.store.count_cities().await?,
    })
}

async fn dashboard_stats(state: &AppState) -> Result<DashboardStats, StoreError> {
    let today = Utc::now().date_naive();
    let donors = state.store.all_donors().await?;
    let total_requests = state.store.count_requests().await?;

    Ok(DashboardStats {
        total_donors: donors.len(),
        eligible_donors: state.matcher.count_eligible(&donors, today),
        total_requests,
        availability: state.matcher.availability(&donors, today),
    })
}

/// Home page
///
/// GET /
async fn home(state: web::Data<AppState>, session: Session) -> HttpResponse {
    match home_summary(&state).await {
        Ok(summary) => html(StatusCode::OK, views::home_page(&summary, &take_flashes(&session))),
        Err(e) => {
            tracing::error!("Failed to load home summary: {}", e);
            storage_failure_page()
        }
    }
}

/// Dashboard with per blood group availability
///
/// GET /dashboard
async fn dashboard(state: web::Data<AppState>, session: Session) -> HttpResponse {
    match dashboard_stats(&state).await {
        Ok(stats) => html(StatusCode::OK, views::dashboard_page(&stats, &take_flashes(&session))),
        Err(e) => {
            tracing::error!("Failed to load dashboard: {}", e);
            storage_failure_page()
        }
    }
}
