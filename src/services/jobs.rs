//! Jobs service
//!
//! High-level business logic for service orders: tracking-code
//! assignment, the two update modes, and the audit trail.
//!
//! The audit append on a status change is best-effort by policy: the
//! status mutation commits first and an append failure is logged but
//! never propagated, so a broken audit path cannot block operations.
//! The cost is possible silent audit loss; the warn log is the only
//! trace of it.

use crate::config::{TRACKING_CODE_LEN, TRACKING_CODE_MAX_ATTEMPTS, TRACKING_CODE_PREFIX};
use crate::database::{
    AppendHistoryRequest, CreateJobRequest, Job, JobFilter, JobHistory, JobWithHistory, Page,
    Repository, UpdateJobRequest,
};
use crate::error::{AppError, Result};
use crate::services::paging;
use rand::Rng;

/// Alphabet for tracking codes; 0/O and 1/I are omitted because the
/// codes are read back over the phone.
const TRACKING_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Service for managing jobs and their history
#[derive(Clone)]
pub struct JobsService {
    repo: Repository,
}

impl JobsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create a new job. Assigns a unique tracking code and records the
    /// creation in the history ledger.
    pub async fn create_job(
        &self,
        req: CreateJobRequest,
        created_by: Option<&str>,
    ) -> Result<Job> {
        if req.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if req.client_name.trim().is_empty() {
            return Err(AppError::Validation("Client name is required".to_string()));
        }

        let tracking_code = self.allocate_tracking_code().await?;

        tracing::info!("Creating job '{}' ({})", req.title, tracking_code);

        let job = self.repo.create_job(&req, &tracking_code, created_by).await?;

        self.repo
            .append_history(
                &job.id,
                job.status,
                job.estimated_completion_date,
                Some("Pekerjaan dibuat"),
                None,
                created_by,
            )
            .await?;

        Ok(job)
    }

    /// Generate a code and retry on the (unlikely) collision. The unique
    /// index on jobs.tracking_code is the actual guarantee.
    async fn allocate_tracking_code(&self) -> Result<String> {
        for _ in 0..TRACKING_CODE_MAX_ATTEMPTS {
            let code = generate_tracking_code();
            if !self.repo.tracking_code_exists(&code).await? {
                return Ok(code);
            }
            tracing::warn!("Tracking code collision on {}, regenerating", code);
        }

        Err(AppError::Generic(
            "Failed to allocate a unique tracking code".to_string(),
        ))
    }

    /// List jobs newest-first with search/status/priority filters.
    pub async fn list_jobs(&self, filter: JobFilter) -> Result<Page<Job>> {
        let (page, per_page) = paging(filter.page, filter.per_page);
        let offset = (page - 1) * per_page;

        let (jobs, total) = self.repo.list_jobs(&filter, per_page, offset).await?;

        Ok(Page::new(jobs, total, page, per_page))
    }

    /// Job plus its visible history, newest first.
    pub async fn get_job(&self, id: &str) -> Result<JobWithHistory> {
        let job = self.repo.get_job(id).await?;
        let history = self.list_history(id).await?;

        Ok(JobWithHistory { job, history })
    }

    /// Update a job. Two modes, selected by the presence of a status
    /// note:
    ///
    /// - Status-update mode: the note is mandatory; only status and
    ///   estimated date change; a history row records the transition.
    /// - Full-update mode: editable fields are replaced; no history row
    ///   is appended in this mode.
    pub async fn update_job(
        &self,
        id: &str,
        req: UpdateJobRequest,
        actor: Option<&str>,
    ) -> Result<Job> {
        let mut job = self.repo.get_job(id).await?;

        if let Some(status_note) = &req.status_note {
            // Status-update mode
            let status_note = status_note.trim();
            if status_note.is_empty() {
                return Err(AppError::Validation("Status note is required".to_string()));
            }

            let old_status = job.status;
            let old_date = job.estimated_completion_date;

            if let Some(status) = req.status {
                job.status = status;
            }
            if let Some(date) = req.estimated_completion_date {
                job.estimated_completion_date = Some(date);
            }

            let system_note = if job.status != old_status {
                format!(
                    "Status diubah dari {} ke {}",
                    old_status.label(),
                    job.status.label()
                )
            } else if job.estimated_completion_date != old_date {
                "Estimasi tanggal selesai diperbarui".to_string()
            } else {
                "Pekerjaan diperbarui".to_string()
            };

            let updated = self.repo.update_job(&job).await?;

            // Best-effort audit append: the status change above has
            // already committed and must not be rolled back here.
            if let Err(e) = self
                .repo
                .append_history(
                    id,
                    updated.status,
                    updated.estimated_completion_date,
                    Some(&system_note),
                    Some(status_note),
                    actor,
                )
                .await
            {
                tracing::warn!(
                    "History append failed for job {} (status change committed): {}",
                    id,
                    e
                );
            }

            Ok(updated)
        } else {
            // Full-update mode: replace editable fields, no history row
            if let Some(title) = req.title {
                if title.trim().is_empty() {
                    return Err(AppError::Validation("Title is required".to_string()));
                }
                job.title = title;
            }
            if let Some(client_name) = req.client_name {
                if client_name.trim().is_empty() {
                    return Err(AppError::Validation("Client name is required".to_string()));
                }
                job.client_name = client_name;
            }
            if let Some(description) = req.description {
                job.description = Some(description);
            }
            if let Some(client_email) = req.client_email {
                job.client_email = Some(client_email);
            }
            if let Some(client_phone) = req.client_phone {
                job.client_phone = Some(client_phone);
            }
            if let Some(status) = req.status {
                job.status = status;
            }
            if let Some(priority) = req.priority {
                job.priority = priority;
            }
            if let Some(date) = req.estimated_completion_date {
                job.estimated_completion_date = Some(date);
            }
            if let Some(date) = req.actual_completion_date {
                job.actual_completion_date = Some(date);
            }
            if let Some(budget) = req.budget {
                job.budget = Some(budget);
            }
            if let Some(notes) = req.notes {
                job.notes = Some(notes);
            }

            self.repo.update_job(&job).await
        }
    }

    /// Hard delete. History and documents cascade away with the job.
    pub async fn delete_job(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting job: {}", id);
        self.repo.delete_job(id).await
    }

    /// Visible history entries, newest first. Rows with neither a system
    /// note nor a user note stay stored but are filtered out here.
    pub async fn list_history(&self, job_id: &str) -> Result<Vec<JobHistory>> {
        // Surface a 404 for unknown jobs rather than an empty list
        self.repo.get_job(job_id).await?;

        let history = self.repo.list_history(job_id).await?;

        Ok(history.into_iter().filter(JobHistory::is_visible).collect())
    }

    /// Manual history append against the job's current status.
    pub async fn append_history(
        &self,
        job_id: &str,
        req: AppendHistoryRequest,
        actor: Option<&str>,
    ) -> Result<JobHistory> {
        let job = self.repo.get_job(job_id).await?;

        let notes = req.notes.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let status_note = req
            .status_note
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        if notes.is_none() && status_note.is_none() {
            return Err(AppError::Validation(
                "A note or status note is required".to_string(),
            ));
        }

        self.repo
            .append_history(
                job_id,
                job.status,
                job.estimated_completion_date,
                notes,
                status_note,
                actor,
            )
            .await
    }
}

/// Generate one candidate tracking code
fn generate_tracking_code() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..TRACKING_CODE_LEN)
        .map(|_| TRACKING_CODE_ALPHABET[rng.gen_range(0..TRACKING_CODE_ALPHABET.len())] as char)
        .collect();

    format!("{}{}", TRACKING_CODE_PREFIX, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{initialize_database, JobPriority, JobStatus};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_service() -> JobsService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        JobsService::new(Repository::new(pool))
    }

    fn create_request(title: &str, client: &str) -> CreateJobRequest {
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

    fn empty_update() -> UpdateJobRequest {
        UpdateJobRequest {
            title: None,
            description: None,
            client_name: None,
            client_email: None,
            client_phone: None,
            status: None,
            priority: None,
            estimated_completion_date: None,
            actual_completion_date: None,
            budget: None,
            notes: None,
            status_note: None,
        }
    }

    #[test]
    fn test_tracking_code_shape() {
        let code = generate_tracking_code();

        assert!(code.starts_with(TRACKING_CODE_PREFIX));
        assert_eq!(code.len(), TRACKING_CODE_PREFIX.len() + TRACKING_CODE_LEN);
        assert!(code
            .bytes()
            .skip(TRACKING_CODE_PREFIX.len())
            .all(|b| TRACKING_CODE_ALPHABET.contains(&b)));
    }

    #[tokio::test]
    async fn test_create_job_appends_creation_history() {
        let service = create_test_service().await;

        let job = service
            .create_job(create_request("Website", "Budi Santoso"), None)
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Pending);

        let history = service.list_history(&job.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].notes.as_deref(), Some("Pekerjaan dibuat"));
    }

    #[tokio::test]
    async fn test_create_job_requires_title_and_client() {
        let service = create_test_service().await;

        let result = service.create_job(create_request("  ", "Budi"), None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service.create_job(create_request("Website", ""), None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_status_update_appends_transition_note() {
        let service = create_test_service().await;

        let job = service
            .create_job(create_request("Website", "Budi Santoso"), None)
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let mut update = empty_update();
        update.status = Some(JobStatus::InProgress);
        update.status_note = Some("Mulai dikerjakan".to_string());

        let updated = service.update_job(&job.id, update, None).await.unwrap();
        assert_eq!(updated.status, JobStatus::InProgress);

        let history = service.list_history(&job.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(
            history[0].notes.as_deref(),
            Some("Status diubah dari Menunggu ke Sedang Dikerjakan")
        );
        assert_eq!(history[0].status_note.as_deref(), Some("Mulai dikerjakan"));
    }

    #[tokio::test]
    async fn test_blank_status_note_rejects_and_mutates_nothing() {
        let service = create_test_service().await;

        let job = service
            .create_job(create_request("Website", "Budi"), None)
            .await
            .unwrap();

        let mut update = empty_update();
        update.status = Some(JobStatus::Completed);
        update.status_note = Some("   ".to_string());

        let result = service.update_job(&job.id, update, None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let unchanged = service.get_job(&job.id).await.unwrap();
        assert_eq!(unchanged.job.status, JobStatus::Pending);
        assert_eq!(unchanged.history.len(), 1);
    }

    #[tokio::test]
    async fn test_date_only_change_note() {
        let service = create_test_service().await;

        let job = service
            .create_job(create_request("Website", "Budi"), None)
            .await
            .unwrap();

        let mut update = empty_update();
        update.estimated_completion_date =
            Some(chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        update.status_note = Some("Jadwal digeser".to_string());

        service.update_job(&job.id, update, None).await.unwrap();

        let history = service.list_history(&job.id).await.unwrap();
        assert_eq!(
            history[0].notes.as_deref(),
            Some("Estimasi tanggal selesai diperbarui")
        );
    }

    #[tokio::test]
    async fn test_no_change_falls_back_to_generic_note() {
        let service = create_test_service().await;

        let job = service
            .create_job(create_request("Website", "Budi"), None)
            .await
            .unwrap();

        let mut update = empty_update();
        update.status = Some(JobStatus::Pending);
        update.status_note = Some("Cek ulang".to_string());

        service.update_job(&job.id, update, None).await.unwrap();

        let history = service.list_history(&job.id).await.unwrap();
        assert_eq!(history[0].notes.as_deref(), Some("Pekerjaan diperbarui"));
    }

    #[tokio::test]
    async fn test_full_update_mode_appends_no_history() {
        let service = create_test_service().await;

        let job = service
            .create_job(create_request("Website", "Budi"), None)
            .await
            .unwrap();

        let mut update = empty_update();
        update.title = Some("Website Toko".to_string());
        update.priority = Some(JobPriority::High);
        update.budget = Some(2_500_000.0);

        let updated = service.update_job(&job.id, update, None).await.unwrap();
        assert_eq!(updated.title, "Website Toko");
        assert_eq!(updated.priority, JobPriority::High);

        // Tracking code is immutable across updates
        assert_eq!(updated.tracking_code, job.tracking_code);

        let history = service.list_history(&job.id).await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_pagination_totals() {
        let service = create_test_service().await;

        for i in 0..12 {
            service
                .create_job(create_request(&format!("Job {}", i), "Budi"), None)
                .await
                .unwrap();
        }

        let page = service.list_jobs(JobFilter::default()).await.unwrap();
        assert_eq!(page.total, 12);
        assert_eq!(page.per_page, 10);
        assert_eq!(page.data.len(), 10);
        assert_eq!(page.total_pages, 2);

        let filter = JobFilter {
            page: Some(2),
            ..Default::default()
        };
        let page = service.list_jobs(filter).await.unwrap();
        assert_eq!(page.data.len(), 2);
    }

    #[tokio::test]
    async fn test_manual_history_append_requires_a_note() {
        let service = create_test_service().await;

        let job = service
            .create_job(create_request("Website", "Budi"), None)
            .await
            .unwrap();

        let result = service
            .append_history(
                &job.id,
                AppendHistoryRequest {
                    notes: None,
                    status_note: Some("  ".to_string()),
                },
                None,
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        service
            .append_history(
                &job.id,
                AppendHistoryRequest {
                    notes: None,
                    status_note: Some("Menunggu pembayaran DP".to_string()),
                },
                None,
            )
            .await
            .unwrap();

        let history = service.list_history(&job.id).await.unwrap();
        assert_eq!(history.len(), 2);
    }
}
