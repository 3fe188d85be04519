//! Todo endpoints — all scoped to the authenticated user

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::database::{CreateTodoRequest, LinkableJob, Todo, UpdateTodoRequest};
use crate::error::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn list_todos(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Todo>>> {
    let todos = state.todos_service.list_todos(&user.id).await?;

    Ok(Json(todos))
}

pub async fn create_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>)> {
    let todo = state.todos_service.create_todo(req, &user.id).await?;

    Ok((StatusCode::CREATED, Json(todo)))
}

/// Jobs eligible for linking from a todo
pub async fn list_linkable_jobs(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<LinkableJob>>> {
    let jobs = state.todos_service.list_linkable_jobs().await?;

    Ok(Json(jobs))
}

pub async fn get_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Todo>> {
    let todo = state.todos_service.get_todo(&id, &user.id).await?;

    Ok(Json(todo))
}

pub async fn update_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTodoRequest>,
) -> Result<Json<Todo>> {
    let todo = state.todos_service.update_todo(&id, req, &user.id).await?;

    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.todos_service.delete_todo(&id, &user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
