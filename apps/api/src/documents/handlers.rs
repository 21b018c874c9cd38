use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::documents::validation::{validate_document, validate_document_patch};
use crate::errors::AppError;
use crate::extract::{ApiJson, ApiQuery};
use crate::models::document::{Document, DocumentPatch, DocumentType, NewDocument};
use crate::routes::parse_record_id;
use crate::state::AppState;
use crate::store::RecordId;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQuery {
    #[serde(rename = "type")]
    pub doc_type: Option<DocumentType>,
    pub application_id: Option<RecordId>,
}

/// GET /api/v1/documents
pub async fn handle_list_documents(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DocumentQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    let docs = match (query.application_id, query.doc_type) {
        (Some(app_id), doc_type) => state
            .documents
            .get_by_application_id(app_id)
            .await?
            .into_iter()
            .filter(|doc| doc_type.map_or(true, |t| doc.doc_type == t))
            .collect(),
        (None, Some(doc_type)) => state.documents.get_by_type(doc_type).await?,
        (None, None) => state.documents.get_all().await?,
    };
    Ok(Json(docs))
}

/// POST /api/v1/documents
pub async fn handle_create_document(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<NewDocument>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    validate_document(&draft).into_result()?;
    let doc = state.documents.create(draft).await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

/// GET /api/v1/documents/:id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, AppError> {
    let id = parse_record_id(&id, "document")?;
    Ok(Json(state.documents.get_by_id(id).await?))
}

/// PATCH /api/v1/documents/:id
pub async fn handle_update_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<DocumentPatch>,
) -> Result<Json<Document>, AppError> {
    let id = parse_record_id(&id, "document")?;
    validate_document_patch(&patch).into_result()?;
    Ok(Json(state.documents.update(id, patch).await?))
}

/// DELETE /api/v1/documents/:id
pub async fn handle_delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_record_id(&id, "document")?;
    state.documents.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
