use axum::{extract::State, Json};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;

use crate::calendar::{events_for_date, month_view, upcoming_reminders, CalendarDay};
use crate::errors::AppError;
use crate::extract::ApiQuery;
use crate::models::application::JobApplication;
use crate::models::interview::ScheduledInterview;
use crate::models::reminder::Reminder;
use crate::state::AppState;

const DEFAULT_UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Default, Deserialize)]
pub struct DayQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpcomingQuery {
    pub limit: Option<usize>,
}

type Sources = (Vec<Reminder>, Vec<JobApplication>, Vec<ScheduledInterview>);

/// Loads all three event sources concurrently; any failure fails the whole load.
async fn load_sources(state: &AppState) -> Result<Sources, AppError> {
    let sources = tokio::try_join!(
        state.reminders.get_all(),
        state.applications.get_all(),
        state.interviews.get_all(),
    )?;
    Ok(sources)
}

fn today(state: &AppState) -> NaiveDate {
    Utc::now()
        .with_timezone(&state.config.calendar_offset)
        .date_naive()
}

/// GET /api/v1/calendar/day?date=YYYY-MM-DD
///
/// Defaults to today in the calendar offset.
pub async fn handle_calendar_day(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DayQuery>,
) -> Result<Json<CalendarDay>, AppError> {
    let date = query.date.unwrap_or_else(|| today(&state));
    let (reminders, applications, interviews) = load_sources(&state).await?;
    let events = events_for_date(
        date,
        &reminders,
        &applications,
        &interviews,
        state.config.calendar_offset,
    );
    Ok(Json(CalendarDay { date, events }))
}

/// GET /api/v1/calendar/month?year=2024&month=1
pub async fn handle_calendar_month(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<Vec<CalendarDay>>, AppError> {
    let current = today(&state);
    let year = query.year.unwrap_or(current.year());
    let month = query.month.unwrap_or(current.month());
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        return Err(AppError::Validation(format!(
            "Invalid month: {year}-{month:02}"
        )));
    }

    let (reminders, applications, interviews) = load_sources(&state).await?;
    let days = month_view(
        year,
        month,
        &reminders,
        &applications,
        &interviews,
        state.config.calendar_offset,
    )
    .ok_or_else(|| AppError::Validation(format!("Invalid month: {year}-{month:02}")))?;
    Ok(Json(days))
}

/// GET /api/v1/calendar/upcoming
pub async fn handle_calendar_upcoming(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UpcomingQuery>,
) -> Result<Json<Vec<Reminder>>, AppError> {
    let reminders = state.reminders.get_all().await?;
    let limit = query.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
    Ok(Json(upcoming_reminders(&reminders, Utc::now(), limit)))
}
