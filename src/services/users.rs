//! User management service
//!
//! Admin surface: list, create, delete and activate/deactivate users.
//! The acting identity comes from the validated session; operations
//! against one's own account are rejected.

use crate::auth::hash_password;
use crate::database::{CreateUserRequest, Repository, UserRole, UserView};
use crate::error::{AppError, Result};
use crate::services::auth::validate_credentials;

/// Service for administering user accounts
#[derive(Clone)]
pub struct UsersService {
    repo: Repository,
}

impl UsersService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn list_users(&self) -> Result<Vec<UserView>> {
        let users = self.repo.list_users().await?;
        Ok(users.into_iter().map(UserView::from).collect())
    }

    pub async fn create_user(&self, req: CreateUserRequest) -> Result<UserView> {
        validate_credentials(&req.username, &req.email, &req.password)?;

        if self
            .repo
            .username_or_email_exists(&req.username, &req.email)
            .await?
        {
            return Err(AppError::Validation(
                "Username or email is already in use".to_string(),
            ));
        }

        let password_hash = hash_password(&req.password)?;

        let user = self
            .repo
            .create_user(
                req.username.trim(),
                req.email.trim(),
                &password_hash,
                req.full_name.as_deref(),
                req.role.unwrap_or(UserRole::Admin),
            )
            .await?;

        tracing::info!("Created user {}", user.username);
        Ok(user.into())
    }

    /// Hard delete, forbidden against the acting account.
    pub async fn delete_user(&self, id: &str, actor_id: &str) -> Result<()> {
        if id == actor_id {
            return Err(AppError::Validation(
                "You cannot delete your own account".to_string(),
            ));
        }

        tracing::info!("Deleting user: {}", id);
        self.repo.delete_user(id).await
    }

    /// Flip the active flag, forbidden against the acting account.
    pub async fn toggle_user_status(&self, id: &str, actor_id: &str) -> Result<UserView> {
        if id == actor_id {
            return Err(AppError::Validation(
                "You cannot deactivate your own account".to_string(),
            ));
        }

        let user = self.repo.get_user(id).await?;
        let updated = self.repo.set_user_active(id, !user.is_active).await?;

        tracing::info!(
            "User {} is now {}",
            updated.username,
            if updated.is_active { "active" } else { "inactive" }
        );
        Ok(updated.into())
    }
}
