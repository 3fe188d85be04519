//! Documents service
//!
//! Creates and manages invoices and receipts tied to jobs. Rendering a
//! document to PDF/PNG is a separate concern; this service only produces
//! the structured record.

use crate::database::{
    CreateDocumentRequest, Document, DocumentFilter, DocumentStatus, DocumentType,
    DocumentWithJob, Page, PaymentMethod, Repository, UpdateDocumentRequest,
};
use crate::error::{AppError, Result};
use crate::services::paging;
use chrono::Utc;

/// Service for managing billing documents
#[derive(Clone)]
pub struct DocumentsService {
    repo: Repository,
}

impl DocumentsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create an invoice or receipt for a job.
    ///
    /// The document number is `{tracking_code}-{INV|RCP}-{millis}`.
    /// Two creations for the same job and type within the same
    /// millisecond would collide; the format is kept for compatibility
    /// with numbers already in circulation.
    pub async fn create_document(
        &self,
        req: CreateDocumentRequest,
        created_by: Option<&str>,
    ) -> Result<Document> {
        if req.amount <= 0.0 {
            return Err(AppError::Validation(
                "Amount must be greater than zero".to_string(),
            ));
        }
        if req.document_type == DocumentType::Invoice && req.due_date.is_none() {
            return Err(AppError::Validation(
                "Due date is required for invoices".to_string(),
            ));
        }
        if req.payment_method == PaymentMethod::Transfer {
            let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
            if blank(&req.bank_name) || blank(&req.bank_account_number) || blank(&req.bank_account_holder) {
                return Err(AppError::Validation(
                    "Bank name, account number and account holder are required for transfers"
                        .to_string(),
                ));
            }
        }

        let job = self.repo.get_job(&req.job_id).await?;

        let document_number = format!(
            "{}-{}-{}",
            job.tracking_code,
            req.document_type.code(),
            Utc::now().timestamp_millis()
        );

        let status = req.status.unwrap_or(match req.document_type {
            DocumentType::Invoice => DocumentStatus::Pending,
            DocumentType::Receipt => DocumentStatus::Paid,
        });

        tracing::info!("Creating document {}", document_number);

        self.repo
            .create_document(&req, &document_number, status, created_by)
            .await
    }

    pub async fn get_document(&self, id: &str) -> Result<DocumentWithJob> {
        self.repo.get_document_with_job(id).await
    }

    pub async fn list_documents(&self, filter: DocumentFilter) -> Result<Page<DocumentWithJob>> {
        let (page, per_page) = paging(filter.page, filter.per_page);
        let offset = (page - 1) * per_page;

        let (documents, total) = self.repo.list_documents(&filter, per_page, offset).await?;

        Ok(Page::new(documents, total, page, per_page))
    }

    /// Administrative correction. The document number, type and job link
    /// never change after issue.
    pub async fn update_document(&self, id: &str, req: UpdateDocumentRequest) -> Result<Document> {
        let mut doc = self.repo.get_document(id).await?;

        if let Some(amount) = req.amount {
            if amount <= 0.0 {
                return Err(AppError::Validation(
                    "Amount must be greater than zero".to_string(),
                ));
            }
            doc.amount = amount;
        }
        if let Some(payment_type) = req.payment_type {
            doc.payment_type = payment_type;
        }
        if let Some(description) = req.description {
            doc.description = Some(description);
        }
        if let Some(due_date) = req.due_date {
            doc.due_date = Some(due_date);
        }
        if let Some(payment_method) = req.payment_method {
            doc.payment_method = payment_method;
        }
        if let Some(bank_name) = req.bank_name {
            doc.bank_name = Some(bank_name);
        }
        if let Some(number) = req.bank_account_number {
            doc.bank_account_number = Some(number);
        }
        if let Some(holder) = req.bank_account_holder {
            doc.bank_account_holder = Some(holder);
        }
        if let Some(notes) = req.notes {
            doc.notes = Some(notes);
        }
        if let Some(status) = req.status {
            doc.status = status;
        }

        self.repo.update_document(&doc).await
    }

    pub async fn delete_document(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting document: {}", id);
        self.repo.delete_document(id).await
    }
}
