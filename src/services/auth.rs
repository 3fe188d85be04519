//! Auth service
//!
//! Login, registration and token-to-user resolution. Login failures are
//! deliberately indistinguishable between unknown username and wrong
//! password.

use crate::auth::{hash_password, issue_session, verify_password};
use crate::config::{AppConfig, MIN_PASSWORD_LENGTH};
use crate::database::{LoginRequest, RegisterRequest, Repository, UserRole, UserView};
use crate::error::{AppError, Result};
use std::sync::Arc;

/// Service for authentication flows
#[derive(Clone)]
pub struct AuthService {
    repo: Repository,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(repo: Repository, config: Arc<AppConfig>) -> Self {
        Self { repo, config }
    }

    /// Verify credentials and issue a session token.
    pub async fn login(&self, req: LoginRequest) -> Result<(UserView, String)> {
        let user = self
            .repo
            .find_user_by_username(&req.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

        if !verify_password(&req.password, &user.password_hash)? {
            return Err(AppError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        if !user.is_active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        let token = issue_session(&user, &self.config.jwt_secret)?;

        tracing::info!("User {} logged in", user.username);
        Ok((user.into(), token))
    }

    /// Self-service registration; new accounts get the admin role.
    pub async fn register(&self, req: RegisterRequest) -> Result<UserView> {
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
                UserRole::Admin,
            )
            .await?;

        tracing::info!("Registered user {}", user.username);
        Ok(user.into())
    }

    /// Resolve the authenticated user's current record.
    pub async fn me(&self, user_id: &str) -> Result<UserView> {
        let user = self.repo.get_user(user_id).await?;

        if !user.is_active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        Ok(user.into())
    }
}

/// Shared credential validation for registration and admin user creation
pub(crate) fn validate_credentials(username: &str, email: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::validate_session;
    use crate::database::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_service() -> AuthService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        let config = Arc::new(AppConfig {
            database_path: ":memory:".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            jwt_secret: "test-secret".to_string(),
            secure_cookies: false,
        });

        AuthService::new(Repository::new(pool), config)
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "rahasia-sekali".to_string(),
            full_name: Some("Administrator".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = create_test_service().await;

        let registered = service.register(register_request()).await.unwrap();
        assert_eq!(registered.role, UserRole::Admin);

        let (user, token) = service
            .login(LoginRequest {
                username: "admin".to_string(),
                password: "rahasia-sekali".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.username, "admin");

        let claims = validate_session(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let service = create_test_service().await;
        service.register(register_request()).await.unwrap();

        let unknown = service
            .login(LoginRequest {
                username: "nobody".to_string(),
                password: "whatever-pass".to_string(),
            })
            .await
            .unwrap_err();

        let wrong = service
            .login(LoginRequest {
                username: "admin".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let service = create_test_service().await;
        service.register(register_request()).await.unwrap();

        let result = service.register(register_request()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let service = create_test_service().await;

        let mut req = register_request();
        req.password = "short".to_string();

        assert!(matches!(
            service.register(req).await,
            Err(AppError::Validation(_))
        ));
    }
}
