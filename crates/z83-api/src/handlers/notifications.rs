//! Notification handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use z83_models::{AccountId, Notification, NotificationId};

use crate::auth::{authorize, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiPath;
use crate::state::AppState;

#[derive(Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
}

/// Notifications addressed to the account named in the path.
pub async fn list_user_notifications(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Json<NotificationListResponse>> {
    let owner = AccountId(user_id);
    authorize(&user, owner)?;

    let notifications = state.store.list_notifications_for(owner).await?;
    Ok(Json(NotificationListResponse { notifications }))
}

/// Mark one of the caller's notifications as read.
pub async fn mark_notification_read(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(notification_id): ApiPath<i64>,
) -> ApiResult<Json<Notification>> {
    let not_found = || ApiError::not_found(format!("Notification {} not found", notification_id));

    let mut notification = state
        .store
        .get_notification(NotificationId(notification_id))
        .await?
        .ok_or_else(not_found)?;

    authorize(&user, notification.account_id)?;

    if !state.store.mark_notification_read(notification.id, user.account_id).await? {
        return Err(not_found());
    }
    notification.read = true;

    Ok(Json(notification))
}
