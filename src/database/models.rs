//! Database models
//!
//! Rust structs representing database entities, the request payloads
//! that mutate them and the projections returned to clients.
//! Status/priority/payment fields are closed enums stored as TEXT; the
//! `label()` functions are the single source of truth for the
//! human-readable (Indonesian) display names.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ===== Enumerations =====

/// Job lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    WaitingClientConfirmation,
    Completed,
    Cancelled,
}

impl JobStatus {
    /// Display label used in transition notes and client-facing views
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Pending => "Menunggu",
            JobStatus::InProgress => "Sedang Dikerjakan",
            JobStatus::WaitingClientConfirmation => "Menunggu Konfirmasi Klien",
            JobStatus::Completed => "Selesai",
            JobStatus::Cancelled => "Dibatalkan",
        }
    }
}

/// Job priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum JobPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl JobPriority {
    pub fn label(&self) -> &'static str {
        match self {
            JobPriority::Low => "Rendah",
            JobPriority::Medium => "Sedang",
            JobPriority::High => "Tinggi",
            JobPriority::Urgent => "Mendesak",
        }
    }
}

/// Todo priority (no urgent tier)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TodoPriority {
    Low,
    Medium,
    High,
}

/// Bank account type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AccountType {
    Giro,
    Savings,
    Current,
}

/// Billing document kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum DocumentType {
    Invoice,
    Receipt,
}

impl DocumentType {
    /// Short code embedded in generated document numbers
    pub fn code(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "INV",
            DocumentType::Receipt => "RCP",
        }
    }
}

/// Payment stage a document bills for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum PaymentType {
    Dp,
    Pelunasan,
    Cicilan,
}

/// How a document is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum PaymentMethod {
    Transfer,
    Cash,
    Card,
}

/// Document payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Paid,
    Cancelled,
}

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    SuperAdmin,
}

// ===== Users =====

/// User row as stored, including the credential hash. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User shape sent to clients (no password hash)
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            full_name: u.full_name,
            role: u.role,
            is_active: u.is_active,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// Admin-created user; role defaults to admin when absent
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
}

// ===== Jobs =====

/// A service order
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Job {
    pub id: String,
    /// Immutable once assigned; unique, case-insensitive lookup key
    pub tracking_code: String,
    pub title: String,
    pub description: Option<String>,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub status: JobStatus,
    pub priority: JobPriority,
    pub estimated_completion_date: Option<NaiveDate>,
    pub actual_completion_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub client_name: String,
    pub description: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub status: Option<JobStatus>,
    pub priority: Option<JobPriority>,
    pub estimated_completion_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub notes: Option<String>,
}

/// Job update payload. When `status_note` is present the request is a
/// status update (note mandatory, history appended); otherwise a full
/// field replacement.
#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub status: Option<JobStatus>,
    pub priority: Option<JobPriority>,
    pub estimated_completion_date: Option<NaiveDate>,
    pub actual_completion_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub notes: Option<String>,
    pub status_note: Option<String>,
}

/// Query-string filters for job listing
#[derive(Debug, Default, Deserialize)]
pub struct JobFilter {
    pub search: Option<String>,
    pub status: Option<JobStatus>,
    pub priority: Option<JobPriority>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// ===== Job history =====

/// Append-only audit row; never updated or deleted
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobHistory {
    pub id: String,
    pub job_id: String,
    pub status: JobStatus,
    pub estimated_completion_date: Option<NaiveDate>,
    /// System-generated transition description
    pub notes: Option<String>,
    /// Free-text note supplied by the acting user
    pub status_note: Option<String>,
    pub changed_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JobHistory {
    /// Entries with neither a system note nor a user note are hidden
    /// from user-facing views (still stored).
    pub fn is_visible(&self) -> bool {
        let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        has(&self.notes) || has(&self.status_note)
    }
}

/// Manual history append (POST /jobs/{id}/history)
#[derive(Debug, Deserialize)]
pub struct AppendHistoryRequest {
    pub notes: Option<String>,
    pub status_note: Option<String>,
}

/// Job detail response: the job plus its history, newest first
#[derive(Debug, Serialize)]
pub struct JobWithHistory {
    #[serde(flatten)]
    pub job: Job,
    pub history: Vec<JobHistory>,
}

// ===== Bank accounts =====

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BankAccount {
    pub id: String,
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    pub account_type: AccountType,
    pub is_primary: bool,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct BankAccountRequest {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    pub account_type: Option<AccountType>,
    #[serde(default)]
    pub is_primary: bool,
    pub notes: Option<String>,
}

// ===== Company settings =====

/// Singleton company profile. Reads fall back to `Default` when the row
/// has never been written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanySettings {
    pub company_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub default_bank_name: Option<String>,
    pub default_bank_account_number: Option<String>,
    pub default_bank_account_holder: Option<String>,
    pub tax_number: Option<String>,
    pub license_number: Option<String>,
}

impl Default for CompanySettings {
    fn default() -> Self {
        Self {
            company_name: "Nama Perusahaan".to_string(),
            address: None,
            phone: None,
            email: None,
            website: None,
            default_bank_name: None,
            default_bank_account_number: None,
            default_bank_account_holder: None,
            tax_number: None,
            license_number: None,
        }
    }
}

// ===== Documents =====

/// Billing record (invoice or receipt) tied to a job
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Document {
    pub id: String,
    pub job_id: String,
    pub document_number: String,
    pub document_type: DocumentType,
    pub payment_type: PaymentType,
    pub amount: f64,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_account_holder: Option<String>,
    pub notes: Option<String>,
    pub status: DocumentStatus,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Document with job context (JOIN result)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DocumentWithJob {
    pub id: String,
    pub job_id: String,
    pub document_number: String,
    pub document_type: DocumentType,
    pub payment_type: PaymentType,
    pub amount: f64,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_account_holder: Option<String>,
    pub notes: Option<String>,
    pub status: DocumentStatus,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub job_title: String,
    pub job_client_name: String,
    pub job_tracking_code: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub job_id: String,
    pub document_type: DocumentType,
    pub payment_type: PaymentType,
    pub amount: f64,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_account_holder: Option<String>,
    pub notes: Option<String>,
    pub status: Option<DocumentStatus>,
}

/// Administrative correction of a document
#[derive(Debug, Deserialize)]
pub struct UpdateDocumentRequest {
    pub payment_type: Option<PaymentType>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_account_holder: Option<String>,
    pub notes: Option<String>,
    pub status: Option<DocumentStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentFilter {
    pub search: Option<String>,
    pub document_type: Option<DocumentType>,
    pub status: Option<DocumentStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// ===== Todos =====

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: TodoPriority,
    pub due_date: Option<NaiveDate>,
    pub job_id: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TodoPriority>,
    pub due_date: Option<NaiveDate>,
    pub job_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<TodoPriority>,
    pub due_date: Option<NaiveDate>,
    pub job_id: Option<String>,
}

/// Job projection offered by the todo link picker
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LinkableJob {
    pub id: String,
    pub title: String,
    pub tracking_code: String,
    pub status: JobStatus,
}

// ===== Pagination =====

/// One page of results plus totals
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            data,
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

// ===== Public tracking =====

/// History entry as shown to unauthenticated clients
#[derive(Debug, Serialize)]
pub struct PublicHistoryEntry {
    pub status: JobStatus,
    pub status_label: &'static str,
    pub estimated_completion_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub status_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Redacted job projection for the public tracking page.
/// Deliberately has no budget field and carries a masked client name.
#[derive(Debug, Serialize)]
pub struct PublicJobView {
    pub tracking_code: String,
    pub title: String,
    pub description: Option<String>,
    pub client_name: String,
    pub status: JobStatus,
    pub status_label: &'static str,
    pub priority: JobPriority,
    pub priority_label: &'static str,
    pub estimated_completion_date: Option<NaiveDate>,
    pub actual_completion_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub history: Vec<PublicHistoryEntry>,
}
