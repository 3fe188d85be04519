//! Company settings endpoints

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::database::CompanySettings;
use crate::error::Result;
use axum::extract::State;
use axum::Json;

/// Stored settings or the typed defaults
pub async fn get_settings(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<CompanySettings>> {
    let settings = state.company_service.get_settings().await?;

    Ok(Json(settings))
}

/// Create-or-update; serves both POST and PUT
pub async fn save_settings(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<CompanySettings>,
) -> Result<Json<CompanySettings>> {
    let settings = state.company_service.save_settings(req).await?;

    Ok(Json(settings))
}
