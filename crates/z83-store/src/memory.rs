//! In-memory store used by tests and local runs without a database.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use z83_models::{
    normalize_email, Account, AccountId, Application, ApplicationId, ApplicationStatus, Job,
    JobId, NewAccount, NewJob, Notification, NotificationId, Profile, Role,
};

use crate::error::{StoreError, StoreResult};
use crate::repos::{
    AccountRecord, AccountStore, ApplicationStore, JobStore, NotificationStore, ProfileStore,
};

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<i64, AccountRecord>,
    emails: HashMap<String, i64>,
    jobs: BTreeMap<i64, Job>,
    applications: BTreeMap<i64, Application>,
    notifications: BTreeMap<i64, Notification>,
    profiles: HashMap<i64, Profile>,
    next_id: i64,
}

impl Tables {
    /// Ids are shared across tables and start at 1, like a single sequence.
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Store backed by process memory. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<AccountRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .emails
            .get(&normalize_email(email))
            .and_then(|id| tables.accounts.get(id))
            .cloned())
    }

    async fn find_account_by_id(&self, id: AccountId) -> StoreResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.get(&id.get()).map(|r| r.account.clone()))
    }

    async fn insert_account(
        &self,
        account: NewAccount,
        password_hash: String,
    ) -> StoreResult<Account> {
        let mut tables = self.tables.write().await;
        let email = normalize_email(&account.email);
        if tables.emails.contains_key(&email) {
            return Err(StoreError::DuplicateEmail);
        }

        let id = tables.next_id();
        let stored = Account {
            id: AccountId(id),
            name: account.name,
            email: email.clone(),
            role: account.role,
            identifier: account.identifier,
            created_at: Utc::now(),
        };
        tables.emails.insert(email, id);
        tables.accounts.insert(
            id,
            AccountRecord {
                account: stored.clone(),
                password_hash,
            },
        );
        Ok(stored)
    }

    async fn count_accounts(&self, role: Role) -> StoreResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .filter(|r| r.account.role == role)
            .count() as u64)
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn list_jobs(&self) -> StoreResult<Vec<Job>> {
        let tables = self.tables.read().await;
        Ok(tables.jobs.values().rev().cloned().collect())
    }

    async fn get_job(&self, id: JobId) -> StoreResult<Option<Job>> {
        Ok(self.tables.read().await.jobs.get(&id.get()).cloned())
    }

    async fn insert_job(&self, job: NewJob, created_by: AccountId) -> StoreResult<Job> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let job = Job {
            id: JobId(id),
            title: job.title,
            department: job.department,
            location: job.location,
            description: job.description,
            closing_date: job.closing_date,
            created_by,
            created_at: Utc::now(),
        };
        tables.jobs.insert(id, job.clone());
        Ok(job)
    }

    async fn count_jobs(&self) -> StoreResult<u64> {
        Ok(self.tables.read().await.jobs.len() as u64)
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn list_applications_for(&self, applicant: AccountId) -> StoreResult<Vec<Application>> {
        let tables = self.tables.read().await;
        Ok(tables
            .applications
            .values()
            .rev()
            .filter(|a| a.applicant_id == applicant)
            .cloned()
            .collect())
    }

    async fn get_application(&self, id: ApplicationId) -> StoreResult<Option<Application>> {
        Ok(self.tables.read().await.applications.get(&id.get()).cloned())
    }

    async fn insert_application(
        &self,
        job_id: JobId,
        applicant: AccountId,
        cover_letter: Option<String>,
    ) -> StoreResult<Application> {
        let mut tables = self.tables.write().await;
        if !tables.jobs.contains_key(&job_id.get()) {
            return Err(StoreError::NotFound(format!("job {}", job_id)));
        }

        let id = tables.next_id();
        let application = Application {
            id: ApplicationId(id),
            job_id,
            applicant_id: applicant,
            status: ApplicationStatus::Pending,
            cover_letter,
            created_at: Utc::now(),
        };
        tables.applications.insert(id, application.clone());
        Ok(application)
    }

    async fn delete_application(
        &self,
        id: ApplicationId,
        applicant: AccountId,
    ) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.applications.get(&id.get()) {
            Some(application) if application.applicant_id == applicant => {
                tables.applications.remove(&id.get());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_applications(&self) -> StoreResult<u64> {
        Ok(self.tables.read().await.applications.len() as u64)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn list_notifications_for(&self, account: AccountId) -> StoreResult<Vec<Notification>> {
        let tables = self.tables.read().await;
        Ok(tables
            .notifications
            .values()
            .rev()
            .filter(|n| n.account_id == account)
            .cloned()
            .collect())
    }

    async fn get_notification(&self, id: NotificationId) -> StoreResult<Option<Notification>> {
        Ok(self.tables.read().await.notifications.get(&id.get()).cloned())
    }

    async fn insert_notification(
        &self,
        account: AccountId,
        message: String,
    ) -> StoreResult<Notification> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let notification = Notification {
            id: NotificationId(id),
            account_id: account,
            message,
            read: false,
            created_at: Utc::now(),
        };
        tables.notifications.insert(id, notification.clone());
        Ok(notification)
    }

    async fn mark_notification_read(
        &self,
        id: NotificationId,
        account: AccountId,
    ) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.notifications.get_mut(&id.get()) {
            Some(notification) if notification.account_id == account => {
                notification.read = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, account: AccountId) -> StoreResult<Option<Profile>> {
        Ok(self.tables.read().await.profiles.get(&account.get()).cloned())
    }

    async fn save_profile(&self, profile: &Profile) -> StoreResult<Profile> {
        self.tables
            .write()
            .await
            .profiles
            .insert(profile.account_id.get(), profile.clone());
        Ok(profile.clone())
    }
}
