//! Admin user-management endpoints — super admin only

use crate::app::AppState;
use crate::auth::SuperAdmin;
use crate::database::{CreateUserRequest, UserView};
use crate::error::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn list_users(
    State(state): State<AppState>,
    SuperAdmin(_admin): SuperAdmin,
) -> Result<Json<Vec<UserView>>> {
    let users = state.users_service.list_users().await?;

    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<AppState>,
    SuperAdmin(_admin): SuperAdmin,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserView>)> {
    let user = state.users_service.create_user(req).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    SuperAdmin(admin): SuperAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.users_service.delete_user(&id, &admin.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_user_status(
    State(state): State<AppState>,
    SuperAdmin(admin): SuperAdmin,
    Path(id): Path<String>,
) -> Result<Json<UserView>> {
    let user = state.users_service.toggle_user_status(&id, &admin.id).await?;

    Ok(Json(user))
}
