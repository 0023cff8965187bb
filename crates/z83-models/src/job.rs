//! Job posting models.

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{AccountId, JobId};

/// A published job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub department: String,
    pub location: String,
    pub description: String,

    /// Last day applications are accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_date: Option<NaiveDate>,

    /// Admin who posted the job
    pub created_by: AccountId,
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Whether applications are still accepted on `today`.
    pub fn is_open_on(&self, today: NaiveDate) -> bool {
        self.closing_date.map_or(true, |closing| today <= closing)
    }
}

/// Fields for a new job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NewJob {
    pub title: String,
    pub department: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
}
