//! Application state and router
//!
//! All services are initialized here and made available to handlers
//! through AppState.

use crate::config::AppConfig;
use crate::database::Repository;
use crate::handlers;
use crate::services::{
    AuthService, BankAccountsService, CompanyService, DocumentsService, JobsService,
    TodosService, TrackingService, UsersService,
};
use axum::routing::{delete, get, patch, post};
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_service: AuthService,
    pub users_service: UsersService,
    pub jobs_service: JobsService,
    pub bank_accounts_service: BankAccountsService,
    pub documents_service: DocumentsService,
    pub todos_service: TodosService,
    pub company_service: CompanyService,
    pub tracking_service: TrackingService,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Arc<AppConfig>) -> Self {
        let repo = Repository::new(pool);

        Self {
            auth_service: AuthService::new(repo.clone(), config.clone()),
            users_service: UsersService::new(repo.clone()),
            jobs_service: JobsService::new(repo.clone()),
            bank_accounts_service: BankAccountsService::new(repo.clone()),
            documents_service: DocumentsService::new(repo.clone()),
            todos_service: TodosService::new(repo.clone()),
            company_service: CompanyService::new(repo.clone()),
            tracking_service: TrackingService::new(repo),
            config,
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Auth
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        // Jobs + history
        .route(
            "/jobs",
            get(handlers::jobs::list_jobs).post(handlers::jobs::create_job),
        )
        .route(
            "/jobs/:id",
            get(handlers::jobs::get_job)
                .put(handlers::jobs::update_job)
                .delete(handlers::jobs::delete_job),
        )
        .route(
            "/jobs/:id/history",
            get(handlers::jobs::list_history).post(handlers::jobs::append_history),
        )
        // Bank accounts
        .route(
            "/bank-accounts",
            get(handlers::bank_accounts::list_accounts)
                .post(handlers::bank_accounts::create_account),
        )
        .route(
            "/bank-accounts/:id",
            get(handlers::bank_accounts::get_account)
                .put(handlers::bank_accounts::update_account)
                .delete(handlers::bank_accounts::delete_account),
        )
        // Company settings (create-or-update on both verbs)
        .route(
            "/company-settings",
            get(handlers::settings::get_settings)
                .post(handlers::settings::save_settings)
                .put(handlers::settings::save_settings),
        )
        // Documents
        .route(
            "/documents",
            get(handlers::documents::list_documents).post(handlers::documents::create_document),
        )
        .route(
            "/documents/:id",
            get(handlers::documents::get_document)
                .put(handlers::documents::update_document)
                .delete(handlers::documents::delete_document),
        )
        // Todos
        .route(
            "/todos",
            get(handlers::todos::list_todos).post(handlers::todos::create_todo),
        )
        .route("/todos/jobs", get(handlers::todos::list_linkable_jobs))
        .route(
            "/todos/:id",
            get(handlers::todos::get_todo)
                .put(handlers::todos::update_todo)
                .delete(handlers::todos::delete_todo),
        )
        // Public tracking
        .route("/tracking/:code", get(handlers::tracking::track_by_code))
        // Admin
        .route(
            "/admin/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/admin/users/:id", delete(handlers::users::delete_user))
        .route(
            "/admin/users/:id/toggle-status",
            patch(handlers::users::toggle_user_status),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
