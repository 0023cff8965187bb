//! Admin dashboard totals.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DashboardStats {
    pub total_jobs: u64,
    pub total_applications: u64,
    pub total_applicants: u64,
}
