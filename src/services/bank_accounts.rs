//! Bank accounts service
//!
//! Maintains the single-primary invariant: among active accounts at most
//! one carries is_primary, and soft-deleting the primary promotes the
//! oldest remaining active account. The repository runs each of these
//! sequences in one transaction, so the original read-then-write race
//! (two statements, transient zero or two primaries) cannot occur here.

use crate::database::{BankAccount, BankAccountRequest, Repository};
use crate::error::{AppError, Result};

/// Service for managing company bank accounts
#[derive(Clone)]
pub struct BankAccountsService {
    repo: Repository,
}

impl BankAccountsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    fn validate(req: &BankAccountRequest) -> Result<()> {
        if req.bank_name.trim().is_empty() {
            return Err(AppError::Validation("Bank name is required".to_string()));
        }
        if req.account_number.trim().is_empty() {
            return Err(AppError::Validation(
                "Account number is required".to_string(),
            ));
        }
        if req.account_holder.trim().is_empty() {
            return Err(AppError::Validation(
                "Account holder is required".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create_account(&self, req: BankAccountRequest) -> Result<BankAccount> {
        Self::validate(&req)?;

        tracing::info!("Creating bank account at {}", req.bank_name);
        self.repo.create_bank_account(&req).await
    }

    pub async fn get_account(&self, id: &str) -> Result<BankAccount> {
        self.repo.get_bank_account(id).await
    }

    pub async fn update_account(&self, id: &str, req: BankAccountRequest) -> Result<BankAccount> {
        Self::validate(&req)?;

        self.repo.update_bank_account(id, &req).await
    }

    /// Soft delete; promotes a replacement primary when needed.
    pub async fn delete_account(&self, id: &str) -> Result<()> {
        tracing::info!("Soft deleting bank account: {}", id);
        self.repo.soft_delete_bank_account(id).await
    }

    /// Active accounts, primary first.
    pub async fn list_accounts(&self) -> Result<Vec<BankAccount>> {
        self.repo.list_bank_accounts().await
    }
}
