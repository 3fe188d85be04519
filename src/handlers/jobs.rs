//! Job endpoints

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::database::{
    AppendHistoryRequest, CreateJobRequest, Job, JobFilter, JobHistory, JobWithHistory, Page,
    UpdateJobRequest,
};
use crate::error::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn list_jobs(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filter): Query<JobFilter>,
) -> Result<Json<Page<Job>>> {
    let page = state.jobs_service.list_jobs(filter).await?;

    Ok(Json(page))
}

pub async fn create_job(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<Job>)> {
    let job = state.jobs_service.create_job(req, Some(&user.id)).await?;

    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn get_job(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<JobWithHistory>> {
    let job = state.jobs_service.get_job(&id).await?;

    Ok(Json(job))
}

pub async fn update_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateJobRequest>,
) -> Result<Json<Job>> {
    let job = state
        .jobs_service
        .update_job(&id, req, Some(&user.id))
        .await?;

    Ok(Json(job))
}

pub async fn delete_job(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.jobs_service.delete_job(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_history(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<JobHistory>>> {
    let history = state.jobs_service.list_history(&id).await?;

    Ok(Json(history))
}

pub async fn append_history(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<AppendHistoryRequest>,
) -> Result<(StatusCode, Json<JobHistory>)> {
    let entry = state
        .jobs_service
        .append_history(&id, req, Some(&user.id))
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}
