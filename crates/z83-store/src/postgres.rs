//! PostgreSQL store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use tracing::{debug, info};

use z83_models::{
    Account, AccountId, Application, ApplicationId, Job, JobId, NewAccount, NewJob, Notification,
    NotificationId, Profile, Role, RoleIdentifier,
};

use crate::error::{is_unique_violation, StoreError, StoreResult};
use crate::repos::{
    AccountRecord, AccountStore, ApplicationStore, JobStore, NotificationStore, ProfileStore,
};

const SCHEMA: &str = include_str!("../sql/schema.sql");

/// Connection settings for [`PgStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://postgres@localhost:5432/z83_project".to_string(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

impl StoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_connections),
            acquire_timeout: std::env::var("DATABASE_ACQUIRE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
        }
    }
}

/// Store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect a new pool.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!(max_connections = config.max_connections, "Connected to PostgreSQL");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        debug!("Schema ensured");
        Ok(())
    }

    /// Round-trip a trivial query.
    pub async fn check_connectivity(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

#[derive(FromRow)]
struct AccountRow {
    id: i64,
    name: String,
    email: String,
    password: String,
    role: String,
    id_no: Option<String>,
    employee_no: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for AccountRecord {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse()?;
        let identifier = RoleIdentifier::from_columns(role, row.id_no, row.employee_no)?;
        Ok(AccountRecord {
            account: Account {
                id: AccountId(row.id),
                name: row.name,
                email: row.email,
                role,
                identifier,
                created_at: row.created_at,
            },
            password_hash: row.password,
        })
    }
}

#[derive(FromRow)]
struct JobRow {
    id: i64,
    title: String,
    department: String,
    location: String,
    description: String,
    closing_date: Option<NaiveDate>,
    created_by: i64,
    created_at: DateTime<Utc>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: JobId(row.id),
            title: row.title,
            department: row.department,
            location: row.location,
            description: row.description,
            closing_date: row.closing_date,
            created_by: AccountId(row.created_by),
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct ApplicationRow {
    id: i64,
    job_id: i64,
    applicant_id: i64,
    status: String,
    cover_letter: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = StoreError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            id: ApplicationId(row.id),
            job_id: JobId(row.job_id),
            applicant_id: AccountId(row.applicant_id),
            status: row.status.parse()?,
            cover_letter: row.cover_letter,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct NotificationRow {
    id: i64,
    user_id: i64,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            id: NotificationId(row.id),
            account_id: AccountId(row.user_id),
            message: row.message,
            read: row.is_read,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct ProfileRow {
    user_id: i64,
    phone: Option<String>,
    address: Option<String>,
    qualifications: Option<String>,
    cv_path: Option<String>,
    id_document_path: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            account_id: AccountId(row.user_id),
            phone: row.phone,
            address: row.address,
            qualifications: row.qualifications,
            cv_path: row.cv_path,
            id_document_path: row.id_document_path,
            updated_at: row.updated_at,
        }
    }
}

const ACCOUNT_COLUMNS: &str = "id, name, email, password, role, id_no, employee_no, created_at";
const JOB_COLUMNS: &str =
    "id, title, department, location, description, closing_date, created_by, created_at";
const APPLICATION_COLUMNS: &str = "id, job_id, applicant_id, status, cover_letter, created_at";
const NOTIFICATION_COLUMNS: &str = "id, user_id, message, is_read, created_at";
const PROFILE_COLUMNS: &str =
    "user_id, phone, address, qualifications, cv_path, id_document_path, updated_at";

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[async_trait]
impl AccountStore for PgStore {
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<AccountRecord>> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(z83_models::normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRecord::try_from).transpose()
    }

    async fn find_account_by_id(&self, id: AccountId) -> StoreResult<Option<Account>> {
        let row: Option<AccountRow> =
            sqlx::query_as(&format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1"))
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row
            .map(AccountRecord::try_from)
            .transpose()?
            .map(|record| record.account))
    }

    async fn insert_account(
        &self,
        account: NewAccount,
        password_hash: String,
    ) -> StoreResult<Account> {
        let row: AccountRow = sqlx::query_as(&format!(
            "INSERT INTO users (name, email, password, role, id_no, employee_no)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(&account.name)
        .bind(z83_models::normalize_email(&account.email))
        .bind(password_hash)
        .bind(account.role.as_str())
        .bind(account.identifier.id_no())
        .bind(account.identifier.employee_no())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateEmail
            } else {
                StoreError::Database(e)
            }
        })?;

        Ok(AccountRecord::try_from(row)?.account)
    }

    async fn count_accounts(&self, role: Role) -> StoreResult<u64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count(n))
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn list_jobs(&self) -> StoreResult<Vec<Job>> {
        let rows: Vec<JobRow> = sqlx::query_as(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn get_job(&self, id: JobId) -> StoreResult<Option<Job>> {
        let row: Option<JobRow> =
            sqlx::query_as(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Job::from))
    }

    async fn insert_job(&self, job: NewJob, created_by: AccountId) -> StoreResult<Job> {
        let row: JobRow = sqlx::query_as(&format!(
            "INSERT INTO jobs (title, department, location, description, closing_date, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(job.title)
        .bind(job.department)
        .bind(job.location)
        .bind(job.description)
        .bind(job.closing_date)
        .bind(created_by.get())
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn count_jobs(&self) -> StoreResult<u64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count(n))
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn list_applications_for(&self, applicant: AccountId) -> StoreResult<Vec<Application>> {
        let rows: Vec<ApplicationRow> = sqlx::query_as(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications
             WHERE applicant_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(applicant.get())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Application::try_from).collect()
    }

    async fn get_application(&self, id: ApplicationId) -> StoreResult<Option<Application>> {
        let row: Option<ApplicationRow> = sqlx::query_as(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Application::try_from).transpose()
    }

    async fn insert_application(
        &self,
        job_id: JobId,
        applicant: AccountId,
        cover_letter: Option<String>,
    ) -> StoreResult<Application> {
        let row: ApplicationRow = sqlx::query_as(&format!(
            "INSERT INTO applications (job_id, applicant_id, cover_letter)
             VALUES ($1, $2, $3)
             RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(job_id.get())
        .bind(applicant.get())
        .bind(cover_letter)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn delete_application(
        &self,
        id: ApplicationId,
        applicant: AccountId,
    ) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND applicant_id = $2")
            .bind(id.get())
            .bind(applicant.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_applications(&self) -> StoreResult<u64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM applications")
            .fetch_one(&self.pool)
            .await?;
        Ok(count(n))
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn list_notifications_for(&self, account: AccountId) -> StoreResult<Vec<Notification>> {
        let rows: Vec<NotificationRow> = sqlx::query_as(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(account.get())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn get_notification(&self, id: NotificationId) -> StoreResult<Option<Notification>> {
        let row: Option<NotificationRow> = sqlx::query_as(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Notification::from))
    }

    async fn insert_notification(
        &self,
        account: AccountId,
        message: String,
    ) -> StoreResult<Notification> {
        let row: NotificationRow = sqlx::query_as(&format!(
            "INSERT INTO notifications (user_id, message)
             VALUES ($1, $2)
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(account.get())
        .bind(message)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn mark_notification_read(
        &self,
        id: NotificationId,
        account: AccountId,
    ) -> StoreResult<bool> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id.get())
                .bind(account.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn get_profile(&self, account: AccountId) -> StoreResult<Option<Profile>> {
        let row: Option<ProfileRow> = sqlx::query_as(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(account.get())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Profile::from))
    }

    async fn save_profile(&self, profile: &Profile) -> StoreResult<Profile> {
        let row: ProfileRow = sqlx::query_as(&format!(
            "INSERT INTO profiles
                (user_id, phone, address, qualifications, cv_path, id_document_path, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (user_id) DO UPDATE SET
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                qualifications = EXCLUDED.qualifications,
                cv_path = EXCLUDED.cv_path,
                id_document_path = EXCLUDED.id_document_path,
                updated_at = EXCLUDED.updated_at
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(profile.account_id.get())
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(&profile.qualifications)
        .bind(&profile.cv_path)
        .bind(&profile.id_document_path)
        .bind(profile.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }
}
