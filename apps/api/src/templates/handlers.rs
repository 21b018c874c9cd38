use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::extract::{ApiJson, ApiQuery};
use crate::models::template::{CoverLetterTemplate, NewTemplate, TemplatePatch};
use crate::routes::parse_record_id;
use crate::state::AppState;
use crate::templates::validation::{validate_template, validate_template_patch};

#[derive(Debug, Default, Deserialize)]
pub struct TemplateQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// GET /api/v1/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TemplateQuery>,
) -> Result<Json<Vec<CoverLetterTemplate>>, AppError> {
    let category = query.category.as_deref().filter(|c| !c.trim().is_empty());
    let templates = match (category, query.search.as_deref()) {
        (Some(category), search) => {
            let term = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();
            state
                .templates
                .get_by_category(category)
                .await?
                .into_iter()
                .filter(|t| {
                    [&t.name, &t.category, &t.content]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&term))
                })
                .collect()
        }
        (None, Some(search)) => state.templates.search(search).await?,
        (None, None) => state.templates.get_all().await?,
    };
    Ok(Json(templates))
}

/// GET /api/v1/templates/categories
pub async fn handle_template_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.templates.categories().await?))
}

/// POST /api/v1/templates
pub async fn handle_create_template(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<NewTemplate>,
) -> Result<(StatusCode, Json<CoverLetterTemplate>), AppError> {
    validate_template(&draft).into_result()?;
    let template = state.templates.create(draft).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/v1/templates/:id
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CoverLetterTemplate>, AppError> {
    let id = parse_record_id(&id, "template")?;
    Ok(Json(state.templates.get_by_id(id).await?))
}

/// PATCH /api/v1/templates/:id
pub async fn handle_update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<TemplatePatch>,
) -> Result<Json<CoverLetterTemplate>, AppError> {
    let id = parse_record_id(&id, "template")?;
    validate_template_patch(&patch).into_result()?;
    Ok(Json(state.templates.update(id, patch).await?))
}

/// DELETE /api/v1/templates/:id
pub async fn handle_delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_record_id(&id, "template")?;
    state.templates.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
