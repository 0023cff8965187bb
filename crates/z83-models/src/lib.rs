//! Shared data models for the Z83 job board backend.
//!
//! This crate provides Serde-serializable types for:
//! - Accounts, roles and role-specific identifiers
//! - Job postings and applications
//! - Notifications and applicant profiles

mod ids;

pub mod account;
pub mod application;
pub mod error;
pub mod job;
pub mod notification;
pub mod profile;
pub mod stats;

// Re-export common types
pub use account::{normalize_email, Account, NewAccount, Role, RoleIdentifier};
pub use application::{Application, ApplicationStatus};
pub use error::{ModelError, ModelResult};
pub use ids::{AccountId, ApplicationId, JobId, NotificationId};
pub use job::{Job, NewJob};
pub use notification::Notification;
pub use profile::{DocumentKind, Profile, ProfileUpdate};
pub use stats::DashboardStats;
