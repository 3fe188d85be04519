//! Public tracking service
//!
//! Unauthenticated, read-only projection of a job for the client-facing
//! tracking page. Two redactions apply: the budget never leaves the
//! server (the view type has no such field) and the client name is
//! partially masked.

use crate::database::{JobHistory, PublicHistoryEntry, PublicJobView, Repository};
use crate::error::{AppError, Result};

/// Service backing the public tracking endpoint
#[derive(Clone)]
pub struct TrackingService {
    repo: Repository,
}

impl TrackingService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Case-insensitive lookup by tracking code.
    pub async fn track_by_code(&self, code: &str) -> Result<PublicJobView> {
        let job = self
            .repo
            .find_job_by_tracking_code(code)
            .await?
            .ok_or_else(|| AppError::JobNotFound(code.to_string()))?;

        let history = self
            .repo
            .list_history(&job.id)
            .await?
            .into_iter()
            .filter(JobHistory::is_visible)
            .map(|entry| PublicHistoryEntry {
                status: entry.status,
                status_label: entry.status.label(),
                estimated_completion_date: entry.estimated_completion_date,
                notes: entry.notes,
                status_note: entry.status_note,
                created_at: entry.created_at,
            })
            .collect();

        Ok(PublicJobView {
            tracking_code: job.tracking_code,
            title: job.title,
            description: job.description,
            client_name: mask_client_name(&job.client_name),
            status: job.status,
            status_label: job.status.label(),
            priority: job.priority,
            priority_label: job.priority.label(),
            estimated_completion_date: job.estimated_completion_date,
            actual_completion_date: job.actual_completion_date,
            created_at: job.created_at,
            updated_at: job.updated_at,
            history,
        })
    }
}

/// Mask a client name word by word: short words (≤4 chars) keep their
/// first and last character, longer words keep the first two and the
/// last one; the middle is asterisk-filled either way.
pub fn mask_client_name(name: &str) -> String {
    name.split_whitespace()
        .map(mask_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn mask_word(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();

    if n <= 2 {
        return word.to_string();
    }

    if n <= 4 {
        let mut masked = String::new();
        masked.push(chars[0]);
        masked.extend(std::iter::repeat('*').take(n - 2));
        masked.push(chars[n - 1]);
        masked
    } else {
        let mut masked = String::new();
        masked.push(chars[0]);
        masked.push(chars[1]);
        masked.extend(std::iter::repeat('*').take(n - 3));
        masked.push(chars[n - 1]);
        masked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{initialize_database, CreateJobRequest, JobStatus, UpdateJobRequest};
    use crate::services::JobsService;
    use sqlx::sqlite::SqlitePoolOptions;

    #[test]
    fn test_masking_rule() {
        // ≤4 chars: first + last kept
        assert_eq!(mask_client_name("Budi"), "B**i");
        assert_eq!(mask_client_name("Ani"), "A*i");
        // ≤2 chars: nothing to hide
        assert_eq!(mask_client_name("Jo"), "Jo");
        // >4 chars: first two + last kept
        assert_eq!(mask_client_name("Santoso"), "Sa****o");
        // Per word, spaces preserved
        assert_eq!(mask_client_name("Budi Santoso"), "B**i Sa****o");
    }

    async fn create_test_services() -> (TrackingService, JobsService) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        let repo = Repository::new(pool);
        (
            TrackingService::new(repo.clone()),
            JobsService::new(repo),
        )
    }

    #[tokio::test]
    async fn test_tracking_view_is_redacted() {
        let (tracking, jobs) = create_test_services().await;

        let job = jobs
            .create_job(
                CreateJobRequest {
                    title: "Website".to_string(),
                    client_name: "Budi Santoso".to_string(),
                    description: None,
                    client_email: None,
                    client_phone: None,
                    status: None,
                    priority: None,
                    estimated_completion_date: None,
                    budget: Some(5_000_000.0),
                    notes: None,
                },
                None,
            )
            .await
            .unwrap();

        // Lookup is case-insensitive
        let view = tracking
            .track_by_code(&job.tracking_code.to_lowercase())
            .await
            .unwrap();

        assert_eq!(view.client_name, "B**i Sa****o");
        assert_eq!(view.history.len(), 1);

        // The serialized view carries no budget key at all
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("budget").is_none());
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let (tracking, _jobs) = create_test_services().await;

        assert!(matches!(
            tracking.track_by_code("JOB-NOPE0000").await,
            Err(AppError::JobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_history_follows_status_updates() {
        let (tracking, jobs) = create_test_services().await;

        let job = jobs
            .create_job(
                CreateJobRequest {
                    title: "Website".to_string(),
                    client_name: "Budi Santoso".to_string(),
                    description: None,
                    client_email: None,
                    client_phone: None,
                    status: None,
                    priority: None,
                    estimated_completion_date: None,
                    budget: None,
                    notes: None,
                },
                None,
            )
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        jobs.update_job(
            &job.id,
            UpdateJobRequest {
                title: None,
                description: None,
                client_name: None,
                client_email: None,
                client_phone: None,
                status: Some(JobStatus::InProgress),
                priority: None,
                estimated_completion_date: None,
                actual_completion_date: None,
                budget: None,
                notes: None,
                status_note: Some("Mulai dikerjakan".to_string()),
            },
            None,
        )
        .await
        .unwrap();

        let view = tracking.track_by_code(&job.tracking_code).await.unwrap();

        assert_eq!(view.status, JobStatus::InProgress);
        assert_eq!(view.status_label, "Sedang Dikerjakan");
        assert_eq!(view.history.len(), 2);
        assert_eq!(
            view.history[0].notes.as_deref(),
            Some("Status diubah dari Menunggu ke Sedang Dikerjakan")
        );
    }
}
