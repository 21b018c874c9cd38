use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Field-keyed validation messages collected by a form check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`. The first message for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(())` when nothing was recorded, otherwise the map as an `AppError`.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidForm(self))
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed for {} field(s)", .0.len())]
    InvalidForm(FieldErrors),

    #[error("Record store error: {0}")]
    Store(StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::InvalidQuery(msg) => AppError::Validation(msg),
            other => AppError::Store(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        rejected_input(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        rejected_input(rejection.body_text())
    }
}

/// Body or query text that failed to deserialize. Keyed by field when the
/// rejection names one, e.g. `"...target type: status: unknown variant ..."`.
fn rejected_input(text: String) -> AppError {
    if let Some((field, message)) = rejected_field(&text) {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        return AppError::InvalidForm(errors);
    }
    AppError::Validation(text)
}

fn rejected_field(text: &str) -> Option<(&str, &str)> {
    let (_, detail) = text.split_once(": ")?;
    let (path, message) = detail.split_once(": ")?;
    let is_path = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '[' || c == ']');
    is_path.then_some((path, message))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg, None),
            AppError::InvalidForm(fields) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "One or more fields are invalid".to_string(),
                Some(fields),
            ),
            AppError::Store(e) => {
                tracing::error!("Record store error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "STORE_ERROR",
                    e.to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(fields) = fields {
            error["fields"] = json!(fields);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
impl FieldErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add("date", "Reminder date and time is required");
        errors.add("date", "Reminder date must be in the future");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("date"), Some("Reminder date and time is required"));
    }

    #[test]
    fn test_into_result() {
        assert!(FieldErrors::new().into_result().is_ok());

        let mut errors = FieldErrors::new();
        errors.add("title", "Job title is required");
        match errors.into_result() {
            Err(AppError::InvalidForm(fields)) => assert!(fields.contains("title")),
            other => panic!("expected InvalidForm, got {other:?}"),
        }
    }

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err: AppError = StoreError::NotFound("Reminder 9 not found".into()).into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = StoreError::Rejected("quota exceeded".into()).into();
        assert!(matches!(err, AppError::Store(_)));
    }

    #[test]
    fn test_rejection_text_is_keyed_by_field() {
        let err = rejected_input(
            "Failed to deserialize the JSON body into the target type: status: unknown variant `hired`"
                .to_string(),
        );
        match err {
            AppError::InvalidForm(fields) => {
                assert_eq!(fields.get("status"), Some("unknown variant `hired`"))
            }
            other => panic!("expected InvalidForm, got {other:?}"),
        }
    }

    #[test]
    fn test_rejection_without_field_is_plain_validation() {
        let err = rejected_input(
            "Failed to parse the request body as JSON: expected value at line 1 column 1".to_string(),
        );
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(rejected_field("Failed to deserialize query string: missing field"), None);
    }

    #[test]
    fn test_invalid_form_response_is_bad_request() {
        let mut errors = FieldErrors::new();
        errors.add("salaryRange", "Minimum salary cannot be greater than maximum");
        let response = AppError::InvalidForm(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
