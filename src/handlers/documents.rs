//! Document endpoints

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::database::{
    CreateDocumentRequest, Document, DocumentFilter, DocumentWithJob, Page, UpdateDocumentRequest,
};
use crate::error::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn list_documents(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filter): Query<DocumentFilter>,
) -> Result<Json<Page<DocumentWithJob>>> {
    let page = state.documents_service.list_documents(filter).await?;

    Ok(Json(page))
}

pub async fn create_document(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<Document>)> {
    let document = state
        .documents_service
        .create_document(req, Some(&user.id))
        .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn get_document(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DocumentWithJob>> {
    let document = state.documents_service.get_document(&id).await?;

    Ok(Json(document))
}

pub async fn update_document(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateDocumentRequest>,
) -> Result<Json<Document>> {
    let document = state.documents_service.update_document(&id, req).await?;

    Ok(Json(document))
}

pub async fn delete_document(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.documents_service.delete_document(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
