//! Admin dashboard handlers.

use axum::extract::State;
use axum::Json;

use z83_models::{DashboardStats, Role};

use crate::auth::{require_role, AuthUser};
use crate::error::ApiResult;
use crate::state::AppState;

/// Totals for the admin dashboard charts.
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<DashboardStats>> {
    require_role(&user, Role::Admin)?;

    let (total_jobs, total_applications, total_applicants) = tokio::try_join!(
        state.store.count_jobs(),
        state.store.count_applications(),
        state.store.count_accounts(Role::Applicant),
    )?;

    Ok(Json(DashboardStats {
        total_jobs,
        total_applications,
        total_applicants,
    }))
}
