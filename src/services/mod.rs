//! Services module
//!
//! Business logic services that coordinate between handlers and repository.

pub mod auth;
pub mod bank_accounts;
pub mod company;
pub mod documents;
pub mod jobs;
pub mod todos;
pub mod tracking;
pub mod users;

use crate::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub use auth::AuthService;
pub use bank_accounts::BankAccountsService;
pub use company::CompanyService;
pub use documents::DocumentsService;
pub use jobs::JobsService;
pub use todos::TodosService;
pub use tracking::TrackingService;
pub use users::UsersService;

/// Resolve requested paging into a sane (page, per_page) pair
pub(crate) fn paging(page: Option<i64>, per_page: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, per_page)
}
