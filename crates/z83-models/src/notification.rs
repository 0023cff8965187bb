//! Account notifications.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{AccountId, NotificationId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Notification {
    pub id: NotificationId,

    /// Recipient
    pub account_id: AccountId,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
