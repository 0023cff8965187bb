//! Applicant profile handlers.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use z83_models::{AccountId, DocumentKind, Profile, ProfileUpdate};

use crate::auth::{authorize, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::security::{document_extension, is_valid_file_name, sanitize_text, sanitize_title};
use crate::state::AppState;
use crate::uploads::save_document;

async fn load_profile(state: &AppState, owner: AccountId) -> ApiResult<Profile> {
    Ok(state
        .store
        .get_profile(owner)
        .await?
        .unwrap_or_else(|| Profile::empty(owner)))
}

/// Get the profile of the account named in the path.
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Json<Profile>> {
    let owner = AccountId(user_id);
    authorize(&user, owner)?;

    Ok(Json(load_profile(&state, owner).await?))
}

/// Profile update body. Unknown fields (including any owner id) are ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(length(max = 5000))]
    pub qualifications: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            phone: request.phone.as_deref().map(sanitize_title),
            address: request.address.as_deref().map(sanitize_text),
            qualifications: request.qualifications.as_deref().map(sanitize_text),
        }
    }
}

/// Save profile fields for the account named in the path.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<Profile>> {
    let owner = AccountId(user_id);
    authorize(&user, owner)?;
    request.validate()?;

    let mut profile = load_profile(&state, owner).await?;
    profile.apply(request.into());

    let saved = state.store.save_profile(&profile).await?;
    info!(account_id = %owner, "Profile saved");

    Ok(Json(saved))
}

/// Upload a CV or identity document (multipart fields `kind` and `file`).
pub async fn upload_document(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(user_id): ApiPath<i64>,
    mut multipart: Multipart,
) -> ApiResult<Json<Profile>> {
    let owner = AccountId(user_id);
    authorize(&user, owner)?;

    let mut kind: Option<DocumentKind> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("kind") => {
                kind = Some(field.text().await?.parse()?);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                if !is_valid_file_name(&file_name) {
                    return Err(ApiError::validation("Invalid file name"));
                }
                let extension = document_extension(&file_name).ok_or_else(|| {
                    ApiError::validation("Unsupported file type (pdf, doc, docx, png, jpg)")
                })?;
                let bytes = field.bytes().await?;
                if bytes.is_empty() {
                    return Err(ApiError::validation("Uploaded file is empty"));
                }
                file = Some((extension, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let kind = kind.ok_or_else(|| ApiError::validation("kind is required"))?;
    let (extension, bytes) = file.ok_or_else(|| ApiError::validation("file is required"))?;

    let path = save_document(&state.config.upload_dir, owner, kind, &extension, &bytes).await?;

    let mut profile = load_profile(&state, owner).await?;
    profile.set_document_path(kind, path);

    Ok(Json(state.store.save_profile(&profile).await?))
}
