use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::applications::listing::{filter_and_sort, ListQuery};
use crate::applications::service::StatusCount;
use crate::applications::validation::{
    validate_application, validate_application_patch, validate_merged_salary,
};
use crate::errors::AppError;
use crate::extract::{ApiJson, ApiQuery};
use crate::models::application::{ApplicationPatch, JobApplication, NewApplication};
use crate::models::document::Document;
use crate::models::reminder::Reminder;
use crate::routes::parse_record_id;
use crate::state::AppState;

/// An application with the documents and reminders that reference it.
#[derive(Debug, Serialize)]
pub struct ApplicationDetail {
    pub application: JobApplication,
    pub documents: Vec<Document>,
    pub reminders: Vec<Reminder>,
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<JobApplication>>, AppError> {
    let apps = match query.status {
        Some(status) => state.applications.get_by_status(status).await?,
        None => state.applications.get_all().await?,
    };
    Ok(Json(filter_and_sort(apps, &query)))
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<NewApplication>,
) -> Result<(StatusCode, Json<JobApplication>), AppError> {
    validate_application(&draft).into_result()?;
    let app = state.applications.create(draft).await?;
    Ok((StatusCode::CREATED, Json(app)))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobApplication>, AppError> {
    let id = parse_record_id(&id, "application")?;
    Ok(Json(state.applications.get_by_id(id).await?))
}

/// PATCH /api/v1/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ApplicationPatch>,
) -> Result<Json<JobApplication>, AppError> {
    let id = parse_record_id(&id, "application")?;
    validate_application_patch(&patch).into_result()?;
    if let Some(salary) = patch.salary.as_ref() {
        if salary.min.is_some() != salary.max.is_some() {
            let current = state.applications.get_by_id(id).await?;
            validate_merged_salary(&current.salary, salary).into_result()?;
        }
    }
    Ok(Json(state.applications.update(id, patch).await?))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_record_id(&id, "application")?;
    state.applications.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/applications/:id/detail
///
/// Loads the application, its documents and its reminders concurrently; any failure
/// fails the whole request.
pub async fn handle_application_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApplicationDetail>, AppError> {
    let id = parse_record_id(&id, "application")?;
    let (application, documents, reminders) = tokio::try_join!(
        state.applications.get_by_id(id),
        state.documents.get_by_application_id(id),
        state.reminders.get_by_application_id(id),
    )?;
    Ok(Json(ApplicationDetail {
        application,
        documents,
        reminders,
    }))
}

/// GET /api/v1/applications/status-counts
pub async fn handle_status_counts(
    State(state): State<AppState>,
) -> Result<Json<Vec<StatusCount>>, AppError> {
    Ok(Json(state.applications.status_counts().await?))
}
