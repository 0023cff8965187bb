//! Job posting and application submission handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use z83_models::{Application, Job, JobId, NewJob, Role};

use crate::auth::{require_role, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::security::{sanitize_text, sanitize_title};
use crate::state::AppState;

#[derive(Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
}

/// List all jobs, newest first.
pub async fn list_jobs(State(state): State<AppState>) -> ApiResult<Json<JobListResponse>> {
    let jobs = state.store.list_jobs().await?;
    Ok(Json(JobListResponse { jobs }))
}

/// Get a single job.
pub async fn get_job(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<i64>,
) -> ApiResult<Json<Job>> {
    let job = state
        .store
        .get_job(JobId(job_id))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Job {} not found", job_id)))?;

    Ok(Json(job))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub department: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
}

/// Post a new job (admin only).
pub async fn create_job(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(request): ApiJson<CreateJobRequest>,
) -> ApiResult<(StatusCode, Json<Job>)> {
    require_role(&user, Role::Admin)?;
    request.validate()?;

    let new_job = NewJob {
        title: sanitize_title(&request.title),
        department: sanitize_title(&request.department),
        location: sanitize_title(&request.location),
        description: sanitize_text(&request.description),
        closing_date: request.closing_date,
    };
    if new_job.title.is_empty() {
        return Err(ApiError::validation("Title is required"));
    }

    let job = state.store.insert_job(new_job, user.account_id).await?;
    info!(job_id = %job.id, account_id = %user.account_id, "Job posted");

    Ok((StatusCode::CREATED, Json(job)))
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ApplyRequest {
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub cover_letter: Option<String>,
}

/// Apply to a job as the authenticated applicant.
///
/// The applicant is always the caller; a confirmation notification is
/// addressed to them once the application is stored.
pub async fn apply_to_job(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(job_id): ApiPath<i64>,
    body: Option<ApiJson<ApplyRequest>>,
) -> ApiResult<(StatusCode, Json<Application>)> {
    require_role(&user, Role::Applicant)?;

    let request = body.map(|ApiJson(r)| r).unwrap_or_default();
    request.validate()?;

    let job = state
        .store
        .get_job(JobId(job_id))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Job {} not found", job_id)))?;

    if !job.is_open_on(Utc::now().date_naive()) {
        return Err(ApiError::validation("Applications for this job have closed"));
    }

    let cover_letter = request
        .cover_letter
        .as_deref()
        .map(sanitize_text)
        .filter(|c| !c.is_empty());

    let application = state
        .store
        .insert_application(job.id, user.account_id, cover_letter)
        .await?;

    info!(
        application_id = %application.id,
        job_id = %job.id,
        account_id = %user.account_id,
        "Application submitted"
    );

    let message = format!("Your application for {} was received", job.title);
    if let Err(e) = state
        .store
        .insert_notification(user.account_id, message)
        .await
    {
        warn!(application_id = %application.id, error = %e, "Failed to create notification");
    }

    Ok((StatusCode::CREATED, Json(application)))
}
