use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::extract::{ApiJson, ApiQuery};
use crate::interviews::validation::{
    validate_note, validate_note_patch, validate_question, validate_question_patch,
    validate_scheduled_interview, validate_scheduled_interview_patch,
};
use crate::models::interview::{
    InterviewNote, InterviewNotePatch, InterviewQuestion, InterviewQuestionPatch,
    NewInterviewNote, NewInterviewQuestion, NewScheduledInterview, ScheduledInterview,
    ScheduledInterviewPatch,
};
use crate::routes::parse_record_id;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NoteQuery {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuestionQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Interview notes
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/interview-notes
pub async fn handle_list_notes(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NoteQuery>,
) -> Result<Json<Vec<InterviewNote>>, AppError> {
    let notes = match query.search.as_deref() {
        Some(term) => state.notes.search(term).await?,
        None => state.notes.get_all().await?,
    };
    Ok(Json(notes))
}

/// POST /api/v1/interview-notes
pub async fn handle_create_note(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<NewInterviewNote>,
) -> Result<(StatusCode, Json<InterviewNote>), AppError> {
    validate_note(&draft).into_result()?;
    let note = state.notes.create(draft).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/v1/interview-notes/:id
pub async fn handle_get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InterviewNote>, AppError> {
    let id = parse_record_id(&id, "interview note")?;
    Ok(Json(state.notes.get_by_id(id).await?))
}

/// PATCH /api/v1/interview-notes/:id
pub async fn handle_update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<InterviewNotePatch>,
) -> Result<Json<InterviewNote>, AppError> {
    let id = parse_record_id(&id, "interview note")?;
    validate_note_patch(&patch).into_result()?;
    Ok(Json(state.notes.update(id, patch).await?))
}

/// DELETE /api/v1/interview-notes/:id
pub async fn handle_delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_record_id(&id, "interview note")?;
    state.notes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Interview questions
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/interview-questions
///
/// `category` narrows in the store; `search` is applied on top of it.
pub async fn handle_list_questions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<QuestionQuery>,
) -> Result<Json<Vec<InterviewQuestion>>, AppError> {
    let category = query.category.as_deref().filter(|c| !c.trim().is_empty());
    let questions = match (category, query.search.as_deref()) {
        (Some(category), Some(term)) => {
            let term = term.trim().to_lowercase();
            state
                .questions
                .get_by_category(category)
                .await?
                .into_iter()
                .filter(|q| {
                    [&q.question, &q.category, &q.answer]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&term))
                })
                .collect()
        }
        (Some(category), None) => state.questions.get_by_category(category).await?,
        (None, Some(term)) => state.questions.search(term).await?,
        (None, None) => state.questions.get_all().await?,
    };
    Ok(Json(questions))
}

/// POST /api/v1/interview-questions
pub async fn handle_create_question(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<NewInterviewQuestion>,
) -> Result<(StatusCode, Json<InterviewQuestion>), AppError> {
    validate_question(&draft).into_result()?;
    let question = state.questions.create(draft).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// GET /api/v1/interview-questions/:id
pub async fn handle_get_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InterviewQuestion>, AppError> {
    let id = parse_record_id(&id, "interview question")?;
    Ok(Json(state.questions.get_by_id(id).await?))
}

/// PATCH /api/v1/interview-questions/:id
pub async fn handle_update_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<InterviewQuestionPatch>,
) -> Result<Json<InterviewQuestion>, AppError> {
    let id = parse_record_id(&id, "interview question")?;
    validate_question_patch(&patch).into_result()?;
    Ok(Json(state.questions.update(id, patch).await?))
}

/// DELETE /api/v1/interview-questions/:id
pub async fn handle_delete_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_record_id(&id, "interview question")?;
    state.questions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Scheduled interviews
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/scheduled-interviews
pub async fn handle_list_interviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScheduledInterview>>, AppError> {
    Ok(Json(state.interviews.get_all().await?))
}

/// POST /api/v1/scheduled-interviews
pub async fn handle_create_interview(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<NewScheduledInterview>,
) -> Result<(StatusCode, Json<ScheduledInterview>), AppError> {
    validate_scheduled_interview(&draft).into_result()?;
    let interview = state.interviews.create(draft).await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

/// GET /api/v1/scheduled-interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScheduledInterview>, AppError> {
    let id = parse_record_id(&id, "interview")?;
    Ok(Json(state.interviews.get_by_id(id).await?))
}

/// PATCH /api/v1/scheduled-interviews/:id
pub async fn handle_update_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ScheduledInterviewPatch>,
) -> Result<Json<ScheduledInterview>, AppError> {
    let id = parse_record_id(&id, "interview")?;
    validate_scheduled_interview_patch(&patch).into_result()?;
    Ok(Json(state.interviews.update(id, patch).await?))
}

/// DELETE /api/v1/scheduled-interviews/:id
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_record_id(&id, "interview")?;
    state.interviews.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
