use axum::{extract::State, Json};

use crate::dashboard::{dashboard_summary, DashboardSummary};
use crate::errors::AppError;
use crate::reminders::service::DEFAULT_UPCOMING_DAYS;
use crate::state::AppState;

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let (applications, reminders) = tokio::try_join!(
        state.applications.get_all(),
        state.reminders.get_upcoming(DEFAULT_UPCOMING_DAYS),
    )?;
    Ok(Json(dashboard_summary(&applications, &reminders)))
}
