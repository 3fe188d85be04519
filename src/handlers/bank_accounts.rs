//! Bank account endpoints

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::database::{BankAccount, BankAccountRequest};
use crate::error::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn list_accounts(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<BankAccount>>> {
    let accounts = state.bank_accounts_service.list_accounts().await?;

    Ok(Json(accounts))
}

pub async fn create_account(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<BankAccountRequest>,
) -> Result<(StatusCode, Json<BankAccount>)> {
    let account = state.bank_accounts_service.create_account(req).await?;

    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn get_account(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<BankAccount>> {
    let account = state.bank_accounts_service.get_account(&id).await?;

    Ok(Json(account))
}

pub async fn update_account(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<BankAccountRequest>,
) -> Result<Json<BankAccount>> {
    let account = state.bank_accounts_service.update_account(&id, req).await?;

    Ok(Json(account))
}

/// Soft delete; a replacement primary is promoted when needed
pub async fn delete_account(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.bank_accounts_service.delete_account(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
