use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_opt_date;
use crate::store::{Entity, RecordId};

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    PhoneScreen,
    Interviewed,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    /// Pipeline order used by the dashboard.
    pub const PIPELINE: [ApplicationStatus; 5] = [
        ApplicationStatus::Applied,
        ApplicationStatus::PhoneScreen,
        ApplicationStatus::Interviewed,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::PhoneScreen => "phone_screen",
            ApplicationStatus::Interviewed => "interviewed",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Statuses counted as progress past the initial application.
    pub fn is_success(&self) -> bool {
        matches!(self, ApplicationStatus::Interviewed | ApplicationStatus::Offer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub title: String,
    pub company: String,
    pub status: ApplicationStatus,
    pub applied_date: NaiveDate,
    pub salary: Salary,
    pub location: String,
    pub notes: String,
    pub job_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// API inputs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryInput {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    pub status: Option<ApplicationStatus>,
    #[serde(default, deserialize_with = "deserialize_opt_date")]
    pub applied_date: Option<NaiveDate>,
    #[serde(default)]
    pub salary: SalaryInput,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub job_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub status: Option<ApplicationStatus>,
    #[serde(default, deserialize_with = "deserialize_opt_date")]
    pub applied_date: Option<NaiveDate>,
    pub salary: Option<SalaryInput>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub job_url: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Store row
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobApplicationRow {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub applied_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for JobApplication {
    const COLLECTION: &'static str = "job_application";
    const LABEL: &'static str = "application";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "title",
        "company",
        "status",
        "applied_date",
        "salary_min",
        "salary_max",
        "salary_currency",
        "location",
        "notes",
        "job_url",
        "created_at",
        "updated_at",
    ];
    type Row = JobApplicationRow;

    fn from_row(row: JobApplicationRow) -> Result<Self, String> {
        let id = row.id.ok_or("missing Id")?;
        let created_at = row.created_at.unwrap_or_default();
        let applied_date = match (row.applied_date, row.created_at) {
            (Some(date), _) => date,
            (None, Some(created)) => created.date_naive(),
            (None, None) => return Err(format!("application {id} has no applied_date")),
        };

        Ok(JobApplication {
            id,
            title: row.title.or(row.name).unwrap_or_default(),
            company: row.company.unwrap_or_default(),
            status: row.status.unwrap_or(ApplicationStatus::Applied),
            applied_date,
            salary: Salary {
                min: row.salary_min,
                max: row.salary_max,
                currency: row
                    .salary_currency
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            },
            location: row.location.unwrap_or_default(),
            notes: row.notes.unwrap_or_default(),
            job_url: row.job_url.unwrap_or_default(),
            created_at,
            updated_at: row.updated_at.unwrap_or(created_at),
        })
    }
}

impl NewApplication {
    /// Store row with creation defaults: status `applied`, today's date, USD.
    pub fn into_row(self, now: DateTime<Utc>) -> JobApplicationRow {
        let title = self.title.trim().to_string();
        JobApplicationRow {
            id: None,
            name: Some(title.clone()),
            title: Some(title),
            company: Some(self.company.trim().to_string()),
            status: Some(self.status.unwrap_or(ApplicationStatus::Applied)),
            applied_date: Some(self.applied_date.unwrap_or_else(|| now.date_naive())),
            salary_min: self.salary.min,
            salary_max: self.salary.max,
            salary_currency: Some(
                self.salary
                    .currency
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            ),
            location: Some(self.location),
            notes: Some(self.notes),
            job_url: Some(self.job_url),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

impl ApplicationPatch {
    /// Partial row carrying only the fields present in the patch.
    pub fn into_row(self, now: DateTime<Utc>) -> JobApplicationRow {
        let title = self.title.map(|t| t.trim().to_string());
        let salary = self.salary.unwrap_or_default();
        JobApplicationRow {
            id: None,
            name: title.clone(),
            title,
            company: self.company.map(|c| c.trim().to_string()),
            status: self.status,
            applied_date: self.applied_date,
            salary_min: salary.min,
            salary_max: salary.max,
            salary_currency: salary.currency.filter(|c| !c.trim().is_empty()),
            location: self.location,
            notes: self.notes,
            job_url: self.job_url,
            created_at: None,
            updated_at: Some(now),
        }
    }
}
