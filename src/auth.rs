//! Credential and session handling
//!
//! Password hashing uses Argon2id with the library defaults (fixed cost,
//! salted, one-way). Sessions are stateless: a signed JWT carried in an
//! HTTP-only cookie is the session — there is no server-side store, so a
//! compromised signing secret compromises every session.
//!
//! Token validation fails closed: any parse or signature problem maps to
//! an authentication failure, never a panic or a 500.

use crate::app::AppState;
use crate::config::{AUTH_COOKIE_NAME, SESSION_TTL_DAYS};
use crate::database::{User, UserRole};
use crate::error::{AppError, Result};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Hash a plaintext password with Argon2id
pub fn hash_password(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AppError::Generic(format!("Password hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored hash
pub fn verify_password(plaintext: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Generic(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok())
}

/// JWT payload embedded in the session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// Issue a signed, time-limited session token for a user
pub fn issue_session(user: &User, secret: &str) -> Result<String> {
    let claims = Claims {
        sub: user.id.clone(),
        username: user.username.clone(),
        email: user.email.clone(),
        role: user.role,
        exp: (Utc::now() + Duration::days(SESSION_TTL_DAYS)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Generic(format!("Token signing failed: {}", e)))
}

/// Validate a session token. Signature and expiry are checked; every
/// failure mode collapses to `Unauthorized`.
pub fn validate_session(token: &str, secret: &str) -> Result<Claims> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired session".to_string()))
}

/// Build the session cookie carrying a freshly issued token
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .build()
}

/// Build an expired cookie that clears the session
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build()
}

/// The authenticated actor, re-derived from the validated token on every
/// request. Self-referential guards (cannot delete own account) compare
/// against this identity, never a client-supplied id.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Unauthorized("Authentication required".to_string()))?;

        let token = jar
            .get(AUTH_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let claims = validate_session(&token, &state.config.jwt_secret)?;

        Ok(AuthUser {
            id: claims.sub,
            username: claims.username,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Extractor gating the admin user-management surface
#[derive(Debug, Clone)]
pub struct SuperAdmin(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for SuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if user.role != UserRole::SuperAdmin {
            return Err(AppError::Forbidden(
                "Super admin privileges required".to_string(),
            ));
        }

        Ok(SuperAdmin(user))
    }
}
