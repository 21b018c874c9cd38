//! Calendar aggregation.
//!
//! Reminders, applications and scheduled interviews are bucketed by calendar day.
//! Reminder timestamps are moved into the configured offset before their date is taken;
//! application and interview dates are already plain dates.

pub mod handlers;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use crate::models::application::JobApplication;
use crate::models::interview::ScheduledInterview;
use crate::models::reminder::Reminder;

/// The record behind an event, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum EventRecord {
    Reminder(Reminder),
    Application(JobApplication),
    Interview(ScheduledInterview),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Reminder type for reminders, `applied` for applications, `interview` for interviews.
    pub event_type: String,
    pub day: NaiveDate,
    #[serde(flatten)]
    pub record: EventRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub events: Vec<CalendarEvent>,
}

/// Calendar day of a reminder in `offset`.
pub fn reminder_day(reminder: &Reminder, offset: FixedOffset) -> NaiveDate {
    reminder.date.with_timezone(&offset).date_naive()
}

/// Events falling on `day`: reminders, then applications, then interviews, each in
/// input order.
pub fn events_for_date(
    day: NaiveDate,
    reminders: &[Reminder],
    applications: &[JobApplication],
    interviews: &[ScheduledInterview],
    offset: FixedOffset,
) -> Vec<CalendarEvent> {
    let reminder_events = reminders
        .iter()
        .filter(|r| reminder_day(r, offset) == day)
        .map(|r| CalendarEvent {
            event_type: r.kind.as_str().to_string(),
            day,
            record: EventRecord::Reminder(r.clone()),
        });

    let application_events = applications
        .iter()
        .filter(|a| a.applied_date == day)
        .map(|a| CalendarEvent {
            event_type: "applied".to_string(),
            day,
            record: EventRecord::Application(a.clone()),
        });

    let interview_events = interviews
        .iter()
        .filter(|i| i.date == day)
        .map(|i| CalendarEvent {
            event_type: "interview".to_string(),
            day,
            record: EventRecord::Interview(i.clone()),
        });

    reminder_events
        .chain(application_events)
        .chain(interview_events)
        .collect()
}

/// One entry per day of `month` with that day's events. `None` for an invalid month.
pub fn month_view(
    year: i32,
    month: u32,
    reminders: &[Reminder],
    applications: &[JobApplication],
    interviews: &[ScheduledInterview],
    offset: FixedOffset,
) -> Option<Vec<CalendarDay>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let days = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|date| CalendarDay {
            date,
            events: events_for_date(date, reminders, applications, interviews, offset),
        })
        .collect();
    Some(days)
}

/// Reminders at or after `now`, soonest first, at most `limit`.
pub fn upcoming_reminders(reminders: &[Reminder], now: DateTime<Utc>, limit: usize) -> Vec<Reminder> {
    let mut upcoming: Vec<Reminder> = reminders
        .iter()
        .filter(|r| r.date >= now)
        .cloned()
        .collect();
    upcoming.sort_by_key(|r| r.date);
    upcoming.truncate(limit);
    upcoming
}
