pub mod health;

use axum::{routing::get, Router};

use crate::applications::handlers as applications;
use crate::calendar::handlers as calendar;
use crate::dashboard::handlers as dashboard;
use crate::documents::handlers as documents;
use crate::errors::AppError;
use crate::interviews::handlers as interviews;
use crate::reminders::handlers as reminders;
use crate::state::AppState;
use crate::store::RecordId;
use crate::templates::handlers as templates;

/// Parses a path id. Anything that is not a positive integer is rejected.
pub fn parse_record_id(raw: &str, label: &str) -> Result<RecordId, AppError> {
    raw.trim()
        .parse::<RecordId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Validation(format!("Invalid {label} ID")))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::health_handler))
        // Applications
        .route(
            "/api/v1/applications",
            get(applications::handle_list_applications)
                .post(applications::handle_create_application),
        )
        .route(
            "/api/v1/applications/status-counts",
            get(applications::handle_status_counts),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handle_get_application)
                .patch(applications::handle_update_application)
                .delete(applications::handle_delete_application),
        )
        .route(
            "/api/v1/applications/:id/detail",
            get(applications::handle_application_detail),
        )
        // Documents
        .route(
            "/api/v1/documents",
            get(documents::handle_list_documents).post(documents::handle_create_document),
        )
        .route(
            "/api/v1/documents/:id",
            get(documents::handle_get_document)
                .patch(documents::handle_update_document)
                .delete(documents::handle_delete_document),
        )
        // Reminders
        .route(
            "/api/v1/reminders",
            get(reminders::handle_list_reminders).post(reminders::handle_create_reminder),
        )
        .route(
            "/api/v1/reminders/upcoming",
            get(reminders::handle_upcoming_reminders),
        )
        .route(
            "/api/v1/reminders/:id",
            get(reminders::handle_get_reminder)
                .patch(reminders::handle_update_reminder)
                .delete(reminders::handle_delete_reminder),
        )
        // Interview preparation
        .route(
            "/api/v1/interview-notes",
            get(interviews::handle_list_notes).post(interviews::handle_create_note),
        )
        .route(
            "/api/v1/interview-notes/:id",
            get(interviews::handle_get_note)
                .patch(interviews::handle_update_note)
                .delete(interviews::handle_delete_note),
        )
        .route(
            "/api/v1/interview-questions",
            get(interviews::handle_list_questions).post(interviews::handle_create_question),
        )
        .route(
            "/api/v1/interview-questions/:id",
            get(interviews::handle_get_question)
                .patch(interviews::handle_update_question)
                .delete(interviews::handle_delete_question),
        )
        .route(
            "/api/v1/scheduled-interviews",
            get(interviews::handle_list_interviews).post(interviews::handle_create_interview),
        )
        .route(
            "/api/v1/scheduled-interviews/:id",
            get(interviews::handle_get_interview)
                .patch(interviews::handle_update_interview)
                .delete(interviews::handle_delete_interview),
        )
        // Cover-letter templates
        .route(
            "/api/v1/templates",
            get(templates::handle_list_templates).post(templates::handle_create_template),
        )
        .route(
            "/api/v1/templates/categories",
            get(templates::handle_template_categories),
        )
        .route(
            "/api/v1/templates/:id",
            get(templates::handle_get_template)
                .patch(templates::handle_update_template)
                .delete(templates::handle_delete_template),
        )
        // Calendar and dashboard
        .route("/api/v1/calendar/day", get(calendar::handle_calendar_day))
        .route("/api/v1/calendar/month", get(calendar::handle_calendar_month))
        .route(
            "/api/v1/calendar/upcoming",
            get(calendar::handle_calendar_upcoming),
        )
        .route("/api/v1/dashboard", get(dashboard::handle_dashboard))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::store::MemoryStore;

    fn app() -> Router {
        build_router(AppState::new(
            Config::in_memory(),
            Arc::new(MemoryStore::new()),
        ))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn engineer_at_acme() -> Value {
        json!({
            "title": "Engineer",
            "company": "Acme",
            "status": "applied",
            "appliedDate": "2024-01-10"
        })
    }

    #[test]
    fn test_parse_record_id() {
        assert_eq!(parse_record_id(" 42 ", "application").unwrap(), 42);
        for raw in ["0", "-3", "abc", "", "1.5"] {
            let err = parse_record_id(raw, "application").unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid application ID"));
        }
    }

    #[tokio::test]
    async fn test_health_reports_store_backend() {
        let (status, body) = send(&app(), "GET", "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "jobtrack-api");
        assert_eq!(body["store"], "memory");
    }

    #[tokio::test]
    async fn test_application_lifecycle_through_status_filter() {
        let app = app();

        let (status, created) =
            send(&app, "POST", "/api/v1/applications", Some(engineer_at_acme())).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["Id"].as_i64().unwrap();
        assert!(id > 0);

        let (_, all) = send(&app, "GET", "/api/v1/applications", None).await;
        assert!(all.as_array().unwrap().iter().any(|a| a["Id"] == id));

        let (status, updated) = send(
            &app,
            "PATCH",
            &format!("/api/v1/applications/{id}"),
            Some(json!({"status": "offer"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "offer");
        assert_eq!(updated["title"], "Engineer");

        let (_, offers) = send(&app, "GET", "/api/v1/applications?status=offer", None).await;
        assert!(offers.as_array().unwrap().iter().any(|a| a["Id"] == id));
        let (_, applied) = send(&app, "GET", "/api/v1/applications?status=applied", None).await;
        assert!(applied.as_array().unwrap().iter().all(|a| a["Id"] != id));

        let (_, counts) = send(&app, "GET", "/api/v1/applications/status-counts", None).await;
        assert_eq!(counts[3], json!({"status": "offer", "count": 1}));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_404() {
        let app = app();
        let (_, created) =
            send(&app, "POST", "/api/v1/applications", Some(engineer_at_acme())).await;
        let uri = format!("/api/v1/applications/{}", created["Id"]);

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_form_returns_field_map() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/v1/applications",
            Some(json!({
                "title": "",
                "company": "Acme",
                "status": "applied",
                "appliedDate": "2024-01-10",
                "salary": {"min": 200000, "max": 100000}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["fields"]["title"], "Job title is required");
        assert_eq!(
            body["error"]["fields"]["salaryRange"],
            "Minimum salary cannot be greater than maximum"
        );
    }

    #[tokio::test]
    async fn test_one_sided_salary_patch_is_checked_against_stored_range() {
        let app = app();
        let mut draft = engineer_at_acme();
        draft["salary"] = json!({"min": 50000, "max": 100000});
        let (_, created) = send(&app, "POST", "/api/v1/applications", Some(draft)).await;
        let uri = format!("/api/v1/applications/{}", created["Id"]);

        let (status, body) =
            send(&app, "PATCH", &uri, Some(json!({"salary": {"min": 200000}}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["fields"]["salaryRange"],
            "Minimum salary cannot be greater than maximum"
        );

        let (_, stored) = send(&app, "GET", &uri, None).await;
        assert_eq!(stored["salary"]["min"], 50000);

        let (status, updated) =
            send(&app, "PATCH", &uri, Some(json!({"salary": {"max": 120000}}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["salary"]["min"], 50000);
        assert_eq!(updated["salary"]["max"], 120000);
    }

    #[tokio::test]
    async fn test_malformed_body_fields_use_error_envelope() {
        let app = app();

        let mut draft = engineer_at_acme();
        draft["status"] = json!("hired");
        let (status, body) = send(&app, "POST", "/api/v1/applications", Some(draft)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["fields"]["status"].is_string());

        let mut draft = engineer_at_acme();
        draft["appliedDate"] = json!("10/01/2024");
        let (status, body) = send(&app, "POST", "/api/v1/applications", Some(draft)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["fields"]["appliedDate"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_query_uses_error_envelope() {
        let (status, body) = send(&app(), "GET", "/api/v1/applications?status=hired", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = send(&app(), "GET", "/api/v1/reminders?applicationId=x", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upcoming_days_out_of_range_is_400() {
        let app = app();
        for days in ["9223372036854775807", "3651", "-1"] {
            let uri = format!("/api/v1/reminders/upcoming?days={days}");
            let (status, body) = send(&app, "GET", &uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "days={days}");
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }

        let (status, body) = send(&app, "GET", "/api/v1/reminders/upcoming?days=3650", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_array());
    }

    #[tokio::test]
    async fn test_bad_id_is_400() {
        let (status, body) = send(&app(), "GET", "/api/v1/applications/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Invalid application ID");
    }

    #[tokio::test]
    async fn test_past_reminder_is_rejected() {
        let past = (Utc::now() - Duration::hours(1)).to_rfc3339();
        let (status, body) = send(
            &app(),
            "POST",
            "/api/v1/reminders",
            Some(json!({"message": "Too late", "date": past, "type": "follow_up"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["fields"]["date"],
            "Reminder date must be in the future"
        );
    }

    #[tokio::test]
    async fn test_application_detail_joins_documents_and_reminders() {
        let app = app();
        let (_, created) =
            send(&app, "POST", "/api/v1/applications", Some(engineer_at_acme())).await;
        let id = created["Id"].as_i64().unwrap();

        send(
            &app,
            "POST",
            "/api/v1/documents",
            Some(json!({"type": "resume", "filename": "cv.pdf", "applicationIds": [id]})),
        )
        .await;
        let soon = (Utc::now() + Duration::days(2)).to_rfc3339();
        send(
            &app,
            "POST",
            "/api/v1/reminders",
            Some(json!({
                "message": "Follow up",
                "date": soon,
                "type": "follow_up",
                "applicationId": id
            })),
        )
        .await;

        let (status, detail) =
            send(&app, "GET", &format!("/api/v1/applications/{id}/detail"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["application"]["Id"], id);
        assert_eq!(detail["documents"][0]["filename"], "cv.pdf");
        assert_eq!(detail["reminders"][0]["message"], "Follow up");

        let (status, _) = send(&app, "GET", "/api/v1/applications/999/detail", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_calendar_day_and_dashboard() {
        let app = app();
        send(&app, "POST", "/api/v1/applications", Some(engineer_at_acme())).await;
        send(
            &app,
            "POST",
            "/api/v1/scheduled-interviews",
            Some(json!({
                "title": "Technical round",
                "company": "Acme",
                "date": "2024-01-10",
                "time": "10:30"
            })),
        )
        .await;

        let (status, day) = send(&app, "GET", "/api/v1/calendar/day?date=2024-01-10", None).await;
        assert_eq!(status, StatusCode::OK);
        let sources: Vec<_> = day["events"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["source"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(sources, vec!["application", "interview"]);

        let (status, _) = send(&app, "GET", "/api/v1/calendar/month?year=2024&month=13", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, dashboard) = send(&app, "GET", "/api/v1/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dashboard["totalApplications"], 1);
        assert_eq!(dashboard["successRate"], 0);
    }

    #[tokio::test]
    async fn test_template_variables_and_categories() {
        let app = app();
        let (status, created) = send(
            &app,
            "POST",
            "/api/v1/templates",
            Some(json!({
                "name": "Standard",
                "category": "Tech",
                "subject": "Application",
                "content": "Dear {hiringManager}, ... {companyName} ..."
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["variables"], json!(["hiringManager", "companyName"]));

        let (_, categories) = send(&app, "GET", "/api/v1/templates/categories", None).await;
        assert_eq!(categories, json!(["Tech"]));
    }
}
