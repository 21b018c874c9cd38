pub mod handlers;

use serde::Serialize;

use crate::applications::service::{count_by_status, StatusCount};
use crate::models::application::JobApplication;
use crate::models::reminder::Reminder;

pub const RECENT_APPLICATIONS: usize = 5;
pub const UPCOMING_REMINDERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_applications: usize,
    pub status_counts: Vec<StatusCount>,
    /// Percentage of applications that reached an interview or an offer.
    pub success_rate: u32,
    pub recent_applications: Vec<JobApplication>,
    pub upcoming_reminders: Vec<Reminder>,
}

pub fn dashboard_summary(
    applications: &[JobApplication],
    upcoming_reminders: &[Reminder],
) -> DashboardSummary {
    let total = applications.len();
    let successes = applications
        .iter()
        .filter(|app| app.status.is_success())
        .count();

    let mut recent = applications.to_vec();
    recent.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
    recent.truncate(RECENT_APPLICATIONS);

    DashboardSummary {
        total_applications: total,
        status_counts: count_by_status(applications),
        success_rate: success_rate(successes, total),
        recent_applications: recent,
        upcoming_reminders: upcoming_reminders
            .iter()
            .take(UPCOMING_REMINDERS)
            .cloned()
            .collect(),
    }
}

fn success_rate(successes: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (successes as f64 * 100.0 / total as f64).round() as u32
}
