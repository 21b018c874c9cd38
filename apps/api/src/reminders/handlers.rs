use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::errors::AppError;
use crate::extract::{ApiJson, ApiQuery};
use crate::models::reminder::{NewReminder, Reminder, ReminderPatch};
use crate::reminders::service::{DEFAULT_UPCOMING_DAYS, MAX_UPCOMING_DAYS};
use crate::reminders::validation::{validate_reminder, validate_reminder_patch};
use crate::routes::parse_record_id;
use crate::state::AppState;
use crate::store::RecordId;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderQuery {
    pub application_id: Option<RecordId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpcomingQuery {
    pub days: Option<i64>,
}

/// GET /api/v1/reminders
pub async fn handle_list_reminders(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReminderQuery>,
) -> Result<Json<Vec<Reminder>>, AppError> {
    let reminders = match query.application_id {
        Some(app_id) => state.reminders.get_by_application_id(app_id).await?,
        None => state.reminders.get_all().await?,
    };
    Ok(Json(reminders))
}

/// GET /api/v1/reminders/upcoming?days=7
pub async fn handle_upcoming_reminders(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UpcomingQuery>,
) -> Result<Json<Vec<Reminder>>, AppError> {
    let days = query.days.unwrap_or(DEFAULT_UPCOMING_DAYS);
    if !(0..=MAX_UPCOMING_DAYS).contains(&days) {
        return Err(AppError::Validation(format!(
            "days must be between 0 and {MAX_UPCOMING_DAYS}"
        )));
    }
    Ok(Json(state.reminders.get_upcoming(days).await?))
}

/// POST /api/v1/reminders
pub async fn handle_create_reminder(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<NewReminder>,
) -> Result<(StatusCode, Json<Reminder>), AppError> {
    validate_reminder(&draft, Utc::now()).into_result()?;
    let reminder = state.reminders.create(draft).await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

/// GET /api/v1/reminders/:id
pub async fn handle_get_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Reminder>, AppError> {
    let id = parse_record_id(&id, "reminder")?;
    Ok(Json(state.reminders.get_by_id(id).await?))
}

/// PATCH /api/v1/reminders/:id
pub async fn handle_update_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ReminderPatch>,
) -> Result<Json<Reminder>, AppError> {
    let id = parse_record_id(&id, "reminder")?;
    validate_reminder_patch(&patch, Utc::now()).into_result()?;
    Ok(Json(state.reminders.update(id, patch).await?))
}

/// DELETE /api/v1/reminders/:id
pub async fn handle_delete_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_record_id(&id, "reminder")?;
    state.reminders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
