//! Registration, login and current-account handlers.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use z83_models::{normalize_email, Account, NewAccount, Role};

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::metrics;
use crate::security::sanitize_title;
use crate::state::AppState;

/// Registration request. Every field is optional at the wire level so a
/// missing field reports as a validation error rather than a parse error.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(max = 200))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Byte length is enforced again when hashing.
    #[validate(length(max = 72, message = "Password must be at most 72 characters"))]
    pub password: Option<String>,

    pub role: Option<String>,
    pub id_no: Option<String>,
    pub employee_no: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: Account,
}

/// Create an account.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(mut request): ApiJson<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    request.email = request.email.map(|e| e.trim().to_string());
    request.validate()?;

    let name = required(request.name.as_deref(), "name")?;
    let email = required(request.email.as_deref(), "email")?;
    let password = required(request.password.as_deref(), "password")?;
    let role: Role = required(request.role.as_deref(), "role")?.parse()?;

    let new_account = NewAccount::new(
        &sanitize_title(name),
        email,
        role,
        request.id_no.as_deref(),
        request.employee_no.as_deref(),
    )?;

    let password_hash = hash_password_blocking(password.to_string()).await?;
    let user = state.store.insert_account(new_account, password_hash).await?;

    info!(account_id = %user.id, role = %user.role, "Account registered");
    metrics::record_registration(user.role.as_str());

    Ok(Json(RegisterResponse { user }))
}

fn required<'a>(value: Option<&'a str>, field: &str) -> ApiResult<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::validation(format!("{} is required", field)))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Verify credentials and issue a session token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (email, password) = match (request.email, request.password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            (normalize_email(&email), password)
        }
        _ => return Err(ApiError::validation("Email and password are required")),
    };

    let record = state.store.find_account_by_email(&email).await?;
    let stored_hash = record.as_ref().map(|r| r.password_hash.clone());

    // Unknown email still pays for one verification
    let verified = verify_password_blocking(password, stored_hash).await;

    let account = match record {
        Some(record) if verified => record.account,
        _ => {
            info!("Login rejected");
            metrics::record_login("failure");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let issued = state
        .tokens
        .issue(account.id, &account.email, account.role)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    info!(account_id = %account.id, role = %account.role, "Login succeeded");
    metrics::record_login("success");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: issued.token,
        role: account.role,
        expires_at: issued.expires_at,
    }))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: Account,
}

/// The authenticated caller's account.
pub async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<MeResponse>> {
    let account = state
        .store
        .find_account_by_id(user.account_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Account not found"))?;

    Ok(Json(MeResponse { user: account }))
}
