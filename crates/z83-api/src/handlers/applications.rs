//! Application handlers. Every route here is scoped to the owning applicant.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use z83_models::{AccountId, Application, ApplicationId};

use crate::auth::{authorize, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiPath;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<Application>,
}

/// The caller's own applications.
pub async fn list_my_applications(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ApplicationListResponse>> {
    let applications = state.store.list_applications_for(user.account_id).await?;
    Ok(Json(ApplicationListResponse { applications }))
}

/// Applications of the account named in the path.
pub async fn list_user_applications(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Json<ApplicationListResponse>> {
    let owner = AccountId(user_id);
    authorize(&user, owner)?;

    let applications = state.store.list_applications_for(owner).await?;
    Ok(Json(ApplicationListResponse { applications }))
}

async fn load_owned(
    state: &AppState,
    user: &AuthUser,
    application_id: i64,
) -> ApiResult<Application> {
    let application = state
        .store
        .get_application(ApplicationId(application_id))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Application {} not found", application_id)))?;

    authorize(user, application.owner())?;
    Ok(application)
}

/// Get one application.
pub async fn get_application(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(application_id): ApiPath<i64>,
) -> ApiResult<Json<Application>> {
    let application = load_owned(&state, &user, application_id).await?;
    Ok(Json(application))
}

/// Withdraw (delete) one application.
pub async fn delete_application(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(application_id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    let application = load_owned(&state, &user, application_id).await?;

    if !state.store.delete_application(application.id, user.account_id).await? {
        return Err(ApiError::not_found(format!(
            "Application {} not found",
            application_id
        )));
    }

    info!(application_id = %application.id, account_id = %user.account_id, "Application withdrawn");
    Ok(StatusCode::NO_CONTENT)
}
