//! Authentication endpoints

use crate::app::AppState;
use crate::auth::{removal_cookie, session_cookie, AuthUser};
use crate::database::{LoginRequest, RegisterRequest, UserView};
use crate::error::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde_json::{json, Value};

/// Verify credentials and set the session cookie
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>)> {
    let (user, token) = state.auth_service.login(req).await?;

    let jar = jar.add(session_cookie(token, state.config.secure_cookies));

    Ok((jar, Json(json!({ "user": user }))))
}

/// Self-service registration
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserView>)> {
    let user = state.auth_service.register(req).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Clear the session cookie
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (jar.add(removal_cookie()), StatusCode::NO_CONTENT)
}

/// Current user, resolved from the session token
pub async fn me(State(state): State<AppState>, user: AuthUser) -> Result<Json<UserView>> {
    let user = state.auth_service.me(&user.id).await?;

    Ok(Json(user))
}
