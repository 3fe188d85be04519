//! Repository layer for database operations
//!
//! This module provides CRUD operations for all entities.
//! Multi-statement invariants (primary bank account exclusivity,
//! soft-delete promotion) run inside transactions.

use super::models::*;
use crate::error::{AppError, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ===== Users =====

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        full_name: Option<&str>,
        role: UserRole,
    ) -> Result<User> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, full_name, role, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .bind(role)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created user: {}", id);
        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn username_or_email_exists(&self, username: &str, email: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? OR email = ?")
                .bind(username)
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::UserNotFound(id.to_string()));
        }

        tracing::debug!("Deleted user: {}", id);
        Ok(())
    }

    pub async fn set_user_active(&self, id: &str, active: bool) -> Result<User> {
        let rows = sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(active)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::UserNotFound(id.to_string()));
        }

        self.get_user(id).await
    }

    // ===== Jobs =====

    pub async fn create_job(
        &self,
        req: &CreateJobRequest,
        tracking_code: &str,
        created_by: Option<&str>,
    ) -> Result<Job> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (
                id, tracking_code, title, description, client_name, client_email,
                client_phone, status, priority, estimated_completion_date,
                actual_completion_date, budget, notes, created_by, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(tracking_code)
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.client_name)
        .bind(&req.client_email)
        .bind(&req.client_phone)
        .bind(req.status.unwrap_or(JobStatus::Pending))
        .bind(req.priority.unwrap_or(JobPriority::Medium))
        .bind(req.estimated_completion_date)
        .bind(req.budget)
        .bind(&req.notes)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created job: {} ({})", id, tracking_code);
        Ok(job)
    }

    pub async fn get_job(&self, id: &str) -> Result<Job> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::JobNotFound(id.to_string()))
    }

    /// Tracking-code lookup; the column collates NOCASE so the match is
    /// case-insensitive.
    pub async fn find_job_by_tracking_code(&self, code: &str) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE tracking_code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(job)
    }

    pub async fn tracking_code_exists(&self, code: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE tracking_code = ?")
            .bind(code)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// List jobs matching the filter, newest first.
    /// Returns the page of rows plus the total match count.
    pub async fn list_jobs(
        &self,
        filter: &JobFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Job>, i64)> {
        // Build the WHERE clause once and reuse it for rows and count
        let mut where_sql = String::from(" WHERE 1=1");
        if filter.search.is_some() {
            where_sql.push_str(
                " AND (title LIKE '%' || ? || '%' \
                 OR client_name LIKE '%' || ? || '%' \
                 OR tracking_code LIKE '%' || ? || '%')",
            );
        }
        if filter.status.is_some() {
            where_sql.push_str(" AND status = ?");
        }
        if filter.priority.is_some() {
            where_sql.push_str(" AND priority = ?");
        }

        let rows_sql = format!(
            "SELECT * FROM jobs{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
            where_sql
        );
        let count_sql = format!("SELECT COUNT(*) FROM jobs{}", where_sql);

        let mut rows_query = sqlx::query_as::<_, Job>(&rows_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(search) = &filter.search {
            rows_query = rows_query.bind(search).bind(search).bind(search);
            count_query = count_query.bind(search).bind(search).bind(search);
        }
        if let Some(status) = filter.status {
            rows_query = rows_query.bind(status);
            count_query = count_query.bind(status);
        }
        if let Some(priority) = filter.priority {
            rows_query = rows_query.bind(priority);
            count_query = count_query.bind(priority);
        }

        let jobs = rows_query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        let total: i64 = count_query.fetch_one(&self.pool).await?;

        Ok((jobs, total))
    }

    /// Persist every mutable field of a job. The tracking code and
    /// creation metadata are immutable and never written here.
    pub async fn update_job(&self, job: &Job) -> Result<Job> {
        let rows = sqlx::query(
            r#"
            UPDATE jobs SET
                title = ?, description = ?, client_name = ?, client_email = ?,
                client_phone = ?, status = ?, priority = ?,
                estimated_completion_date = ?, actual_completion_date = ?,
                budget = ?, notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.client_name)
        .bind(&job.client_email)
        .bind(&job.client_phone)
        .bind(job.status)
        .bind(job.priority)
        .bind(job.estimated_completion_date)
        .bind(job.actual_completion_date)
        .bind(job.budget)
        .bind(&job.notes)
        .bind(Utc::now())
        .bind(&job.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::JobNotFound(job.id.clone()));
        }

        self.get_job(&job.id).await
    }

    /// Hard delete. History rows and documents go with the job via
    /// ON DELETE CASCADE.
    pub async fn delete_job(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::JobNotFound(id.to_string()));
        }

        tracing::debug!("Deleted job: {}", id);
        Ok(())
    }

    // ===== Job history (append-only) =====

    pub async fn append_history(
        &self,
        job_id: &str,
        status: JobStatus,
        estimated_completion_date: Option<chrono::NaiveDate>,
        notes: Option<&str>,
        status_note: Option<&str>,
        changed_by: Option<&str>,
    ) -> Result<JobHistory> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let entry = sqlx::query_as::<_, JobHistory>(
            r#"
            INSERT INTO job_history (
                id, job_id, status, estimated_completion_date, notes,
                status_note, changed_by, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(job_id)
        .bind(status)
        .bind(estimated_completion_date)
        .bind(notes)
        .bind(status_note)
        .bind(changed_by)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Appended history {} for job {}", id, job_id);
        Ok(entry)
    }

    pub async fn list_history(&self, job_id: &str) -> Result<Vec<JobHistory>> {
        let entries = sqlx::query_as::<_, JobHistory>(
            "SELECT * FROM job_history WHERE job_id = ? ORDER BY created_at DESC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    // ===== Bank accounts =====

    /// Create an account. When the new account is primary, the previous
    /// primary is cleared in the same transaction so no reader ever sees
    /// two primaries.
    pub async fn create_bank_account(&self, req: &BankAccountRequest) -> Result<BankAccount> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        if req.is_primary {
            sqlx::query("UPDATE bank_accounts SET is_primary = 0 WHERE is_active = 1")
                .execute(&mut *tx)
                .await?;
        }

        let account = sqlx::query_as::<_, BankAccount>(
            r#"
            INSERT INTO bank_accounts (
                id, bank_name, account_number, account_holder, account_type,
                is_primary, is_active, notes, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.bank_name)
        .bind(&req.account_number)
        .bind(&req.account_holder)
        .bind(req.account_type.unwrap_or(AccountType::Savings))
        .bind(req.is_primary)
        .bind(&req.notes)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Created bank account: {}", id);
        Ok(account)
    }

    pub async fn get_bank_account(&self, id: &str) -> Result<BankAccount> {
        sqlx::query_as::<_, BankAccount>("SELECT * FROM bank_accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::BankAccountNotFound(id.to_string()))
    }

    pub async fn update_bank_account(
        &self,
        id: &str,
        req: &BankAccountRequest,
    ) -> Result<BankAccount> {
        let mut tx = self.pool.begin().await?;

        if req.is_primary {
            sqlx::query("UPDATE bank_accounts SET is_primary = 0 WHERE is_active = 1 AND id != ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let rows = sqlx::query(
            r#"
            UPDATE bank_accounts SET
                bank_name = ?, account_number = ?, account_holder = ?,
                account_type = ?, is_primary = ?, notes = ?, updated_at = ?
            WHERE id = ? AND is_active = 1
            "#,
        )
        .bind(&req.bank_name)
        .bind(&req.account_number)
        .bind(&req.account_holder)
        .bind(req.account_type.unwrap_or(AccountType::Savings))
        .bind(req.is_primary)
        .bind(&req.notes)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::BankAccountNotFound(id.to_string()));
        }

        tx.commit().await?;

        self.get_bank_account(id).await
    }

    /// Soft delete. If the deleted account was primary, the oldest
    /// remaining active account (creation order) is promoted inside the
    /// same transaction, so at most one primary is ever observable.
    pub async fn soft_delete_bank_account(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let was_primary: Option<bool> =
            sqlx::query_scalar("SELECT is_primary FROM bank_accounts WHERE id = ? AND is_active = 1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(was_primary) = was_primary else {
            return Err(AppError::BankAccountNotFound(id.to_string()));
        };

        sqlx::query(
            "UPDATE bank_accounts SET is_active = 0, is_primary = 0, updated_at = ? WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if was_primary {
            sqlx::query(
                r#"
                UPDATE bank_accounts SET is_primary = 1
                WHERE id = (
                    SELECT id FROM bank_accounts
                    WHERE is_active = 1
                    ORDER BY created_at ASC, id ASC
                    LIMIT 1
                )
                "#,
            )
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!("Soft deleted bank account: {}", id);
        Ok(())
    }

    /// Active accounts only: primary first, then creation order.
    pub async fn list_bank_accounts(&self) -> Result<Vec<BankAccount>> {
        let accounts = sqlx::query_as::<_, BankAccount>(
            r#"
            SELECT * FROM bank_accounts
            WHERE is_active = 1
            ORDER BY is_primary DESC, created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    // ===== Company settings (singleton) =====

    pub async fn get_company_settings(&self) -> Result<Option<CompanySettings>> {
        let settings = sqlx::query_as::<_, CompanySettings>(
            r#"
            SELECT company_name, address, phone, email, website,
                   default_bank_name, default_bank_account_number,
                   default_bank_account_holder, tax_number, license_number
            FROM company_settings WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    pub async fn upsert_company_settings(&self, settings: &CompanySettings) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO company_settings (
                id, company_name, address, phone, email, website,
                default_bank_name, default_bank_account_number,
                default_bank_account_holder, tax_number, license_number, updated_at
            )
            VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                company_name = excluded.company_name,
                address = excluded.address,
                phone = excluded.phone,
                email = excluded.email,
                website = excluded.website,
                default_bank_name = excluded.default_bank_name,
                default_bank_account_number = excluded.default_bank_account_number,
                default_bank_account_holder = excluded.default_bank_account_holder,
                tax_number = excluded.tax_number,
                license_number = excluded.license_number,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&settings.company_name)
        .bind(&settings.address)
        .bind(&settings.phone)
        .bind(&settings.email)
        .bind(&settings.website)
        .bind(&settings.default_bank_name)
        .bind(&settings.default_bank_account_number)
        .bind(&settings.default_bank_account_holder)
        .bind(&settings.tax_number)
        .bind(&settings.license_number)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!("Saved company settings");
        Ok(())
    }

    // ===== Documents =====

    pub async fn create_document(
        &self,
        req: &CreateDocumentRequest,
        document_number: &str,
        status: DocumentStatus,
        created_by: Option<&str>,
    ) -> Result<Document> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (
                id, job_id, document_number, document_type, payment_type, amount,
                description, due_date, payment_method, bank_name,
                bank_account_number, bank_account_holder, notes, status,
                created_by, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.job_id)
        .bind(document_number)
        .bind(req.document_type)
        .bind(req.payment_type)
        .bind(req.amount)
        .bind(&req.description)
        .bind(req.due_date)
        .bind(req.payment_method)
        .bind(&req.bank_name)
        .bind(&req.bank_account_number)
        .bind(&req.bank_account_holder)
        .bind(&req.notes)
        .bind(status)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created document: {} ({})", id, document_number);
        Ok(document)
    }

    pub async fn get_document(&self, id: &str) -> Result<Document> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::DocumentNotFound(id.to_string()))
    }

    pub async fn get_document_with_job(&self, id: &str) -> Result<DocumentWithJob> {
        sqlx::query_as::<_, DocumentWithJob>(
            r#"
            SELECT d.*, j.title AS job_title, j.client_name AS job_client_name,
                   j.tracking_code AS job_tracking_code
            FROM documents d
            JOIN jobs j ON j.id = d.job_id
            WHERE d.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::DocumentNotFound(id.to_string()))
    }

    pub async fn list_documents(
        &self,
        filter: &DocumentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<DocumentWithJob>, i64)> {
        let mut where_sql = String::from(" WHERE 1=1");
        if filter.search.is_some() {
            where_sql.push_str(
                " AND (d.description LIKE '%' || ? || '%' \
                 OR d.document_number LIKE '%' || ? || '%' \
                 OR j.title LIKE '%' || ? || '%' \
                 OR j.client_name LIKE '%' || ? || '%')",
            );
        }
        if filter.document_type.is_some() {
            where_sql.push_str(" AND d.document_type = ?");
        }
        if filter.status.is_some() {
            where_sql.push_str(" AND d.status = ?");
        }

        let rows_sql = format!(
            r#"
            SELECT d.*, j.title AS job_title, j.client_name AS job_client_name,
                   j.tracking_code AS job_tracking_code
            FROM documents d
            JOIN jobs j ON j.id = d.job_id{}
            ORDER BY d.created_at DESC LIMIT ? OFFSET ?
            "#,
            where_sql
        );
        let count_sql = format!(
            "SELECT COUNT(*) FROM documents d JOIN jobs j ON j.id = d.job_id{}",
            where_sql
        );

        let mut rows_query = sqlx::query_as::<_, DocumentWithJob>(&rows_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(search) = &filter.search {
            rows_query = rows_query.bind(search).bind(search).bind(search).bind(search);
            count_query = count_query.bind(search).bind(search).bind(search).bind(search);
        }
        if let Some(document_type) = filter.document_type {
            rows_query = rows_query.bind(document_type);
            count_query = count_query.bind(document_type);
        }
        if let Some(status) = filter.status {
            rows_query = rows_query.bind(status);
            count_query = count_query.bind(status);
        }

        let documents = rows_query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        let total: i64 = count_query.fetch_one(&self.pool).await?;

        Ok((documents, total))
    }

    /// Administrative correction; the document number, job link and type
    /// are immutable once issued.
    pub async fn update_document(&self, doc: &Document) -> Result<Document> {
        let rows = sqlx::query(
            r#"
            UPDATE documents SET
                payment_type = ?, amount = ?, description = ?, due_date = ?,
                payment_method = ?, bank_name = ?, bank_account_number = ?,
                bank_account_holder = ?, notes = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(doc.payment_type)
        .bind(doc.amount)
        .bind(&doc.description)
        .bind(doc.due_date)
        .bind(doc.payment_method)
        .bind(&doc.bank_name)
        .bind(&doc.bank_account_number)
        .bind(&doc.bank_account_holder)
        .bind(&doc.notes)
        .bind(doc.status)
        .bind(Utc::now())
        .bind(&doc.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::DocumentNotFound(doc.id.clone()));
        }

        self.get_document(&doc.id).await
    }

    pub async fn delete_document(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::DocumentNotFound(id.to_string()));
        }

        tracing::debug!("Deleted document: {}", id);
        Ok(())
    }

    // ===== Todos (creator-scoped) =====

    pub async fn create_todo(&self, req: &CreateTodoRequest, created_by: &str) -> Result<Todo> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (
                id, title, description, completed, priority, due_date,
                job_id, created_by, created_at, updated_at
            )
            VALUES (?, ?, ?, 0, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.priority.unwrap_or(TodoPriority::Medium))
        .bind(req.due_date)
        .bind(&req.job_id)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created todo: {} for user {}", id, created_by);
        Ok(todo)
    }

    pub async fn get_todo(&self, id: &str, owner: &str) -> Result<Todo> {
        sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE id = ? AND created_by = ?")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::TodoNotFound(id.to_string()))
    }

    pub async fn list_todos(&self, owner: &str) -> Result<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>(
            "SELECT * FROM todos WHERE created_by = ? ORDER BY completed ASC, created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    pub async fn update_todo(&self, todo: &Todo) -> Result<Todo> {
        let rows = sqlx::query(
            r#"
            UPDATE todos SET
                title = ?, description = ?, completed = ?, priority = ?,
                due_date = ?, job_id = ?, updated_at = ?
            WHERE id = ? AND created_by = ?
            "#,
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.priority)
        .bind(todo.due_date)
        .bind(&todo.job_id)
        .bind(Utc::now())
        .bind(&todo.id)
        .bind(&todo.created_by)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::TodoNotFound(todo.id.clone()));
        }

        self.get_todo(&todo.id, &todo.created_by).await
    }

    pub async fn delete_todo(&self, id: &str, owner: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM todos WHERE id = ? AND created_by = ?")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::TodoNotFound(id.to_string()));
        }

        tracing::debug!("Deleted todo: {}", id);
        Ok(())
    }

    pub async fn list_linkable_jobs(&self) -> Result<Vec<LinkableJob>> {
        let jobs = sqlx::query_as::<_, LinkableJob>(
            "SELECT id, title, tracking_code, status FROM jobs ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::schema::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_repo() -> Repository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        Repository::new(pool)
    }

    fn job_request(title: &str, client: &str) -> CreateJobRequest {
        CreateJobRequest {
            title: title.to_string(),
            client_name: client.to_string(),
            description: None,
            client_email: None,
            client_phone: None,
            status: None,
            priority: None,
            estimated_completion_date: None,
            budget: None,
            notes: None,
        }
    }

    fn account_request(bank: &str, primary: bool) -> BankAccountRequest {
        BankAccountRequest {
            bank_name: bank.to_string(),
            account_number: "1234567890".to_string(),
            account_holder: "PT Contoh".to_string(),
            account_type: None,
            is_primary: primary,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_job() {
        let repo = create_test_repo().await;

        let job = repo
            .create_job(&job_request("Website", "Budi Santoso"), "JOB-TEST0001", None)
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.priority, JobPriority::Medium);

        let fetched = repo.get_job(&job.id).await.unwrap();
        assert_eq!(fetched.tracking_code, "JOB-TEST0001");
    }

    #[tokio::test]
    async fn test_tracking_code_lookup_is_case_insensitive() {
        let repo = create_test_repo().await;

        repo.create_job(&job_request("Website", "Budi"), "JOB-ABCD1234", None)
            .await
            .unwrap();

        let found = repo
            .find_job_by_tracking_code("job-abcd1234")
            .await
            .unwrap();
        assert!(found.is_some());

        assert!(repo.tracking_code_exists("Job-Abcd1234").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_jobs_filters_and_pagination() {
        let repo = create_test_repo().await;

        for i in 0..3 {
            repo.create_job(
                &job_request(&format!("Website {}", i), "Budi"),
                &format!("JOB-WEB{:05}", i),
                None,
            )
            .await
            .unwrap();
        }

        let mut req = job_request("Logo", "Siti");
        req.status = Some(JobStatus::InProgress);
        repo.create_job(&req, "JOB-LOGO0001", None).await.unwrap();

        // Search across title/client/tracking code
        let filter = JobFilter {
            search: Some("web".to_string()),
            ..Default::default()
        };
        let (jobs, total) = repo.list_jobs(&filter, 10, 0).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(jobs.len(), 3);

        // Status filter
        let filter = JobFilter {
            status: Some(JobStatus::InProgress),
            ..Default::default()
        };
        let (jobs, total) = repo.list_jobs(&filter, 10, 0).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(jobs[0].title, "Logo");

        // Pagination window
        let filter = JobFilter::default();
        let (page, total) = repo.list_jobs(&filter, 2, 2).await.unwrap();
        assert_eq!(total, 4);
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let repo = create_test_repo().await;

        let job = repo
            .create_job(&job_request("Website", "Budi"), "JOB-HIST0001", None)
            .await
            .unwrap();

        repo.append_history(&job.id, JobStatus::Pending, None, Some("Pekerjaan dibuat"), None, None)
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        repo.append_history(
            &job.id,
            JobStatus::InProgress,
            None,
            Some("Status diubah dari Menunggu ke Sedang Dikerjakan"),
            Some("Mulai dikerjakan"),
            None,
        )
        .await
        .unwrap();

        let history = repo.list_history(&job.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].status, JobStatus::InProgress);
        assert_eq!(history[1].status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn test_job_delete_cascades() {
        let repo = create_test_repo().await;

        let job = repo
            .create_job(&job_request("Website", "Budi"), "JOB-CASC0001", None)
            .await
            .unwrap();
        repo.append_history(&job.id, JobStatus::Pending, None, Some("Pekerjaan dibuat"), None, None)
            .await
            .unwrap();

        let doc_req = CreateDocumentRequest {
            job_id: job.id.clone(),
            document_type: DocumentType::Receipt,
            payment_type: PaymentType::Dp,
            amount: 500_000.0,
            description: None,
            due_date: None,
            payment_method: PaymentMethod::Cash,
            bank_name: None,
            bank_account_number: None,
            bank_account_holder: None,
            notes: None,
            status: None,
        };
        repo.create_document(&doc_req, "JOB-CASC0001-RCP-1", DocumentStatus::Paid, None)
            .await
            .unwrap();

        repo.delete_job(&job.id).await.unwrap();

        let history: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_history")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        let documents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(repo.pool())
            .await
            .unwrap();

        assert_eq!(history, 0);
        assert_eq!(documents, 0);
    }

    async fn active_primary_count(repo: &Repository) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM bank_accounts WHERE is_active = 1 AND is_primary = 1",
        )
        .fetch_one(repo.pool())
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_primary_account_exclusivity() {
        let repo = create_test_repo().await;

        let a = repo
            .create_bank_account(&account_request("Bank A", true))
            .await
            .unwrap();
        assert!(a.is_primary);

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let b = repo
            .create_bank_account(&account_request("Bank B", true))
            .await
            .unwrap();
        assert!(b.is_primary);

        assert_eq!(active_primary_count(&repo).await, 1);

        let a = repo.get_bank_account(&a.id).await.unwrap();
        assert!(!a.is_primary);
    }

    #[tokio::test]
    async fn test_soft_delete_promotes_oldest_active() {
        let repo = create_test_repo().await;

        let a = repo
            .create_bank_account(&account_request("Bank A", true))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let b = repo
            .create_bank_account(&account_request("Bank B", true))
            .await
            .unwrap();

        repo.soft_delete_bank_account(&b.id).await.unwrap();

        let a = repo.get_bank_account(&a.id).await.unwrap();
        assert!(a.is_primary);
        assert_eq!(active_primary_count(&repo).await, 1);

        // Deleting the last active account leaves zero primaries
        repo.soft_delete_bank_account(&a.id).await.unwrap();
        assert_eq!(active_primary_count(&repo).await, 0);

        let accounts = repo.list_bank_accounts().await.unwrap();
        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn test_list_accounts_primary_first() {
        let repo = create_test_repo().await;

        repo.create_bank_account(&account_request("Bank A", false))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        repo.create_bank_account(&account_request("Bank B", true))
            .await
            .unwrap();

        let accounts = repo.list_bank_accounts().await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].bank_name, "Bank B");
        assert!(accounts[0].is_primary);
    }

    #[tokio::test]
    async fn test_company_settings_upsert() {
        let repo = create_test_repo().await;

        assert!(repo.get_company_settings().await.unwrap().is_none());

        let mut settings = CompanySettings {
            company_name: "CV Maju Jaya".to_string(),
            ..Default::default()
        };
        repo.upsert_company_settings(&settings).await.unwrap();

        let stored = repo.get_company_settings().await.unwrap().unwrap();
        assert_eq!(stored.company_name, "CV Maju Jaya");

        settings.phone = Some("0812345678".to_string());
        repo.upsert_company_settings(&settings).await.unwrap();

        let stored = repo.get_company_settings().await.unwrap().unwrap();
        assert_eq!(stored.phone.as_deref(), Some("0812345678"));

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM company_settings")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_todos_are_scoped_to_creator() {
        let repo = create_test_repo().await;

        let alice = repo
            .create_user("alice", "alice@example.com", "hash", None, UserRole::Admin)
            .await
            .unwrap();
        let bob = repo
            .create_user("bob", "bob@example.com", "hash", None, UserRole::Admin)
            .await
            .unwrap();

        let req = CreateTodoRequest {
            title: "Follow up klien".to_string(),
            description: None,
            priority: None,
            due_date: None,
            job_id: None,
        };
        let todo = repo.create_todo(&req, &alice.id).await.unwrap();

        assert_eq!(repo.list_todos(&alice.id).await.unwrap().len(), 1);
        assert!(repo.list_todos(&bob.id).await.unwrap().is_empty());

        // Bob cannot read or delete Alice's todo
        assert!(repo.get_todo(&todo.id, &bob.id).await.is_err());
        assert!(repo.delete_todo(&todo.id, &bob.id).await.is_err());

        repo.delete_todo(&todo.id, &alice.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_user_crud() {
        let repo = create_test_repo().await;

        let user = repo
            .create_user(
                "admin",
                "admin@example.com",
                "hash",
                Some("Administrator"),
                UserRole::SuperAdmin,
            )
            .await
            .unwrap();

        assert!(user.is_active);
        assert_eq!(user.role, UserRole::SuperAdmin);

        assert!(repo
            .username_or_email_exists("admin", "other@example.com")
            .await
            .unwrap());

        let deactivated = repo.set_user_active(&user.id, false).await.unwrap();
        assert!(!deactivated.is_active);

        repo.delete_user(&user.id).await.unwrap();
        assert!(repo.get_user(&user.id).await.is_err());
    }
}
