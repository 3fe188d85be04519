//! Application configuration
//!
//! Central location for configuration constants, validation boundaries
//! and the environment-derived runtime configuration.

// ===== Sessions =====

/// Name of the HTTP-only session cookie
pub const AUTH_COOKIE_NAME: &str = "auth_token";

/// Session lifetime in days; the JWT expiry and the cookie max-age both
/// derive from this value so they cannot drift apart.
pub const SESSION_TTL_DAYS: i64 = 7;

// ===== Pagination =====

/// Default page size for list endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size a client may request
pub const MAX_PAGE_SIZE: i64 = 100;

// ===== Tracking codes =====

/// Prefix for generated job tracking codes (e.g. "JOB-7K2F9QXD")
pub const TRACKING_CODE_PREFIX: &str = "JOB-";

/// Number of random characters following the prefix
pub const TRACKING_CODE_LEN: usize = 8;

/// How many times code generation retries on a collision before the
/// create fails outright. Collisions are vanishingly rare at 8 chars of
/// [A-Z0-9]; the bound exists so a broken RNG cannot loop forever.
pub const TRACKING_CODE_MAX_ATTEMPTS: u32 = 5;

// ===== Validation boundaries =====

/// Minimum password length for registration and admin user creation
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Runtime configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the SQLite database file
    pub database_path: String,
    /// Bind address for the HTTP listener
    pub bind_addr: String,
    /// Secret used to sign and verify session tokens
    pub jwt_secret: String,
    /// Whether session cookies are flagged Secure (production)
    pub secure_cookies: bool,
}

impl AppConfig {
    /// Read configuration from the environment, falling back to
    /// development defaults for anything unset.
    pub fn from_env() -> Self {
        let secure_cookies = std::env::var("SERVISTRACK_SECURE_COOKIES")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let jwt_secret = std::env::var("SERVISTRACK_JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("SERVISTRACK_JWT_SECRET not set, using development secret");
            "servistrack-dev-secret".to_string()
        });

        Self {
            database_path: std::env::var("SERVISTRACK_DB")
                .unwrap_or_else(|_| "servistrack.db".to_string()),
            bind_addr: std::env::var("SERVISTRACK_BIND")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            jwt_secret,
            secure_cookies,
        }
    }
}
