//! Company settings service
//!
//! The settings table holds zero or one row. Reads return the stored row
//! or a typed default; the first write creates the row, later writes
//! update it.

use crate::database::{CompanySettings, Repository};
use crate::error::{AppError, Result};

/// Service for the singleton company profile
#[derive(Clone)]
pub struct CompanyService {
    repo: Repository,
}

impl CompanyService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Stored settings, or the defaults when nothing was saved yet.
    pub async fn get_settings(&self) -> Result<CompanySettings> {
        Ok(self
            .repo
            .get_company_settings()
            .await?
            .unwrap_or_default())
    }

    /// Create-or-update the settings row.
    pub async fn save_settings(&self, settings: CompanySettings) -> Result<CompanySettings> {
        if settings.company_name.trim().is_empty() {
            return Err(AppError::Validation("Company name is required".to_string()));
        }

        self.repo.upsert_company_settings(&settings).await?;

        self.get_settings().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_service() -> CompanyService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        CompanyService::new(Repository::new(pool))
    }

    #[tokio::test]
    async fn test_get_falls_back_to_defaults() {
        let service = create_test_service().await;

        let settings = service.get_settings().await.unwrap();
        assert_eq!(settings.company_name, CompanySettings::default().company_name);
    }

    #[tokio::test]
    async fn test_save_then_get_round_trips() {
        let service = create_test_service().await;

        let settings = CompanySettings {
            company_name: "CV Maju Jaya".to_string(),
            phone: Some("0812345678".to_string()),
            ..Default::default()
        };
        service.save_settings(settings).await.unwrap();

        let stored = service.get_settings().await.unwrap();
        assert_eq!(stored.company_name, "CV Maju Jaya");
        assert_eq!(stored.phone.as_deref(), Some("0812345678"));
    }

    #[tokio::test]
    async fn test_blank_company_name_rejected() {
        let service = create_test_service().await;

        let settings = CompanySettings {
            company_name: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            service.save_settings(settings).await,
            Err(AppError::Validation(_))
        ));
    }
}
