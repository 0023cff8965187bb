//! Repository traits consumed by the API layer.

use std::fmt;

use async_trait::async_trait;

use z83_models::{
    Account, AccountId, Application, ApplicationId, Job, JobId, NewAccount, NewJob, Notification,
    NotificationId, Profile, Role,
};

use crate::error::StoreResult;

/// An account together with its stored password hash.
///
/// Only the login path sees this type; everything returned to clients is the
/// plain [`Account`].
#[derive(Clone)]
pub struct AccountRecord {
    pub account: Account,
    pub password_hash: String,
}

impl fmt::Debug for AccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRecord")
            .field("account", &self.account)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by normalized email.
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<AccountRecord>>;

    async fn find_account_by_id(&self, id: AccountId) -> StoreResult<Option<Account>>;

    /// Insert a new account. A taken email yields [`StoreError::DuplicateEmail`].
    ///
    /// [`StoreError::DuplicateEmail`]: crate::StoreError::DuplicateEmail
    async fn insert_account(&self, account: NewAccount, password_hash: String)
        -> StoreResult<Account>;

    async fn count_accounts(&self, role: Role) -> StoreResult<u64>;
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// All jobs, newest first.
    async fn list_jobs(&self) -> StoreResult<Vec<Job>>;

    async fn get_job(&self, id: JobId) -> StoreResult<Option<Job>>;

    async fn insert_job(&self, job: NewJob, created_by: AccountId) -> StoreResult<Job>;

    async fn count_jobs(&self) -> StoreResult<u64>;
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Applications owned by `applicant`, newest first.
    async fn list_applications_for(&self, applicant: AccountId) -> StoreResult<Vec<Application>>;

    async fn get_application(&self, id: ApplicationId) -> StoreResult<Option<Application>>;

    async fn insert_application(
        &self,
        job_id: JobId,
        applicant: AccountId,
        cover_letter: Option<String>,
    ) -> StoreResult<Application>;

    /// Delete `id` only if `applicant` owns it. Returns false when nothing was deleted.
    async fn delete_application(&self, id: ApplicationId, applicant: AccountId)
        -> StoreResult<bool>;

    async fn count_applications(&self) -> StoreResult<u64>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Notifications addressed to `account`, newest first.
    async fn list_notifications_for(&self, account: AccountId) -> StoreResult<Vec<Notification>>;

    async fn get_notification(&self, id: NotificationId) -> StoreResult<Option<Notification>>;

    async fn insert_notification(
        &self,
        account: AccountId,
        message: String,
    ) -> StoreResult<Notification>;

    /// Returns false when no such notification is addressed to `account`.
    async fn mark_notification_read(
        &self,
        id: NotificationId,
        account: AccountId,
    ) -> StoreResult<bool>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, account: AccountId) -> StoreResult<Option<Profile>>;

    /// Insert or replace the profile keyed by `profile.account_id`.
    async fn save_profile(&self, profile: &Profile) -> StoreResult<Profile>;
}

/// Everything the API needs from persistence.
pub trait Store:
    AccountStore + JobStore + ApplicationStore + NotificationStore + ProfileStore
{
}

impl<T> Store for T where
    T: AccountStore + JobStore + ApplicationStore + NotificationStore + ProfileStore
{
}
