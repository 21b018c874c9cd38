use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_opt_date, join_list, split_list};
use crate::store::{Entity, RecordId};

pub const DEFAULT_QUESTION_CATEGORY: &str = "General";

/// Characters of the question kept in the store's display `Name` column.
const QUESTION_NAME_CHARS: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Interview notes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewNote {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub title: String,
    pub company: String,
    pub position: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInterviewNote {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewNotePatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewNoteRow {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Comma-joined tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for InterviewNote {
    const COLLECTION: &'static str = "interview_note";
    const LABEL: &'static str = "interview note";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "title",
        "company",
        "position",
        "content",
        "tags",
        "created_at",
        "updated_at",
    ];
    type Row = InterviewNoteRow;

    fn from_row(row: InterviewNoteRow) -> Result<Self, String> {
        let created_at = row.created_at.unwrap_or_default();
        Ok(InterviewNote {
            id: row.id.ok_or("missing Id")?,
            title: row.title.or(row.name).unwrap_or_default(),
            company: row.company.unwrap_or_default(),
            position: row.position.unwrap_or_default(),
            content: row.content.unwrap_or_default(),
            tags: row.tags.as_deref().map(split_list).unwrap_or_default(),
            created_at,
            updated_at: row.updated_at.unwrap_or(created_at),
        })
    }
}

fn clean_tags(tags: Vec<String>) -> String {
    let cleaned: Vec<String> = tags
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    join_list(&cleaned)
}

impl NewInterviewNote {
    pub fn into_row(self, now: DateTime<Utc>) -> InterviewNoteRow {
        let title = self.title.trim().to_string();
        InterviewNoteRow {
            id: None,
            name: Some(title.clone()),
            title: Some(title),
            company: Some(self.company.trim().to_string()),
            position: Some(self.position.trim().to_string()),
            content: Some(self.content),
            tags: Some(clean_tags(self.tags)),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

impl InterviewNotePatch {
    pub fn into_row(self, now: DateTime<Utc>) -> InterviewNoteRow {
        let title = self.title.map(|t| t.trim().to_string());
        InterviewNoteRow {
            id: None,
            name: title.clone(),
            title,
            company: self.company.map(|c| c.trim().to_string()),
            position: self.position.map(|p| p.trim().to_string()),
            content: self.content,
            tags: self.tags.map(clean_tags),
            created_at: None,
            updated_at: Some(now),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Interview questions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestion {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub question: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub answer: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInterviewQuestion {
    #[serde(default)]
    pub question: String,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestionPatch {
    pub question: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub answer: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewQuestionRow {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for InterviewQuestion {
    const COLLECTION: &'static str = "interview_question";
    const LABEL: &'static str = "interview question";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "question",
        "category",
        "difficulty",
        "answer",
        "notes",
        "created_at",
        "updated_at",
    ];
    type Row = InterviewQuestionRow;

    fn from_row(row: InterviewQuestionRow) -> Result<Self, String> {
        let created_at = row.created_at.unwrap_or_default();
        Ok(InterviewQuestion {
            id: row.id.ok_or("missing Id")?,
            question: row.question.unwrap_or_default(),
            category: row
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_QUESTION_CATEGORY.to_string()),
            difficulty: row.difficulty.unwrap_or_default(),
            answer: row.answer.unwrap_or_default(),
            notes: row.notes.unwrap_or_default(),
            created_at,
            updated_at: row.updated_at.unwrap_or(created_at),
        })
    }
}

/// Display name for a question: its first 50 characters followed by "...".
pub fn question_display_name(question: &str) -> String {
    if question.is_empty() {
        return String::new();
    }
    let head: String = question.chars().take(QUESTION_NAME_CHARS).collect();
    format!("{head}...")
}

impl NewInterviewQuestion {
    pub fn into_row(self, now: DateTime<Utc>) -> InterviewQuestionRow {
        let question = self.question.trim().to_string();
        InterviewQuestionRow {
            id: None,
            name: Some(question_display_name(&question)),
            question: Some(question),
            category: Some(
                self.category
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| DEFAULT_QUESTION_CATEGORY.to_string()),
            ),
            difficulty: Some(self.difficulty.unwrap_or_default()),
            answer: Some(self.answer),
            notes: Some(self.notes),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

impl InterviewQuestionPatch {
    pub fn into_row(self, now: DateTime<Utc>) -> InterviewQuestionRow {
        let question = self.question.map(|q| q.trim().to_string());
        InterviewQuestionRow {
            id: None,
            name: question.as_deref().map(question_display_name),
            question,
            category: self.category.map(|c| c.trim().to_string()),
            difficulty: self.difficulty,
            answer: self.answer,
            notes: self.notes,
            created_at: None,
            updated_at: Some(now),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scheduled interviews
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledInterview {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub title: String,
    pub company: String,
    pub position: String,
    pub date: NaiveDate,
    /// Wall-clock start, `HH:MM`.
    pub time: String,
    pub location: String,
    pub interviewer_name: String,
    pub interviewer_email: String,
    pub notes: String,
    pub status: InterviewStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduledInterview {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default, deserialize_with = "deserialize_opt_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub interviewer_name: String,
    #[serde(default)]
    pub interviewer_email: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledInterviewPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_date")]
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub interviewer_name: Option<String>,
    pub interviewer_email: Option<String>,
    pub notes: Option<String>,
    pub status: Option<InterviewStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduledInterviewRow {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interviewer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interviewer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InterviewStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for ScheduledInterview {
    const COLLECTION: &'static str = "scheduled_interview";
    const LABEL: &'static str = "interview";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "title",
        "company",
        "position",
        "date",
        "time",
        "location",
        "interviewer_name",
        "interviewer_email",
        "notes",
        "status",
        "created_at",
        "updated_at",
    ];
    type Row = ScheduledInterviewRow;

    fn from_row(row: ScheduledInterviewRow) -> Result<Self, String> {
        let id = row.id.ok_or("missing Id")?;
        let created_at = row.created_at.unwrap_or_default();
        Ok(ScheduledInterview {
            id,
            title: row.title.or(row.name).unwrap_or_default(),
            company: row.company.unwrap_or_default(),
            position: row.position.unwrap_or_default(),
            date: row
                .date
                .ok_or_else(|| format!("interview {id} has no date"))?,
            time: row.time.unwrap_or_default(),
            location: row.location.unwrap_or_default(),
            interviewer_name: row.interviewer_name.unwrap_or_default(),
            interviewer_email: row.interviewer_email.unwrap_or_default(),
            notes: row.notes.unwrap_or_default(),
            status: row.status.unwrap_or_default(),
            created_at,
            updated_at: row.updated_at.unwrap_or(created_at),
        })
    }
}

impl NewScheduledInterview {
    /// New interviews are always `scheduled`; a missing date falls back to `now`'s date.
    pub fn into_row(self, now: DateTime<Utc>) -> ScheduledInterviewRow {
        let title = self.title.trim().to_string();
        ScheduledInterviewRow {
            id: None,
            name: Some(title.clone()),
            title: Some(title),
            company: Some(self.company.trim().to_string()),
            position: Some(self.position.trim().to_string()),
            date: Some(self.date.unwrap_or_else(|| now.date_naive())),
            time: Some(self.time.trim().to_string()),
            location: Some(self.location),
            interviewer_name: Some(self.interviewer_name),
            interviewer_email: Some(self.interviewer_email),
            notes: Some(self.notes),
            status: Some(InterviewStatus::Scheduled),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

impl ScheduledInterviewPatch {
    pub fn into_row(self, now: DateTime<Utc>) -> ScheduledInterviewRow {
        let title = self.title.map(|t| t.trim().to_string());
        ScheduledInterviewRow {
            id: None,
            name: title.clone(),
            title,
            company: self.company.map(|c| c.trim().to_string()),
            position: self.position.map(|p| p.trim().to_string()),
            date: self.date,
            time: self.time.map(|t| t.trim().to_string()),
            location: self.location,
            interviewer_name: self.interviewer_name,
            interviewer_email: self.interviewer_email,
            notes: self.notes,
            status: self.status,
            created_at: None,
            updated_at: Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_display_name_truncates_on_char_boundary() {
        let long = "é".repeat(60);
        let name = question_display_name(&long);
        assert_eq!(name.chars().count(), QUESTION_NAME_CHARS + 3);
        assert!(name.ends_with("..."));
        assert_eq!(question_display_name(""), "");
    }

    #[test]
    fn test_note_tags_are_trimmed() {
        let row = NewInterviewNote {
            title: "Onsite".into(),
            tags: vec![" system design ".into(), "".into(), "behavioral".into()],
            ..Default::default()
        }
        .into_row(Utc::now());
        assert_eq!(row.tags.as_deref(), Some("system design,behavioral"));

        let note = InterviewNote::from_row(InterviewNoteRow { id: Some(1), ..row }).unwrap();
        assert_eq!(note.tags, vec!["system design", "behavioral"]);
    }

    #[test]
    fn test_question_defaults() {
        let row = NewInterviewQuestion {
            question: "Tell me about a conflict".into(),
            category: Some("  ".into()),
            ..Default::default()
        }
        .into_row(Utc::now());
        assert_eq!(row.category.as_deref(), Some(DEFAULT_QUESTION_CATEGORY));
        assert_eq!(row.difficulty, Some(Difficulty::Medium));
    }

    #[test]
    fn test_new_interview_is_always_scheduled() {
        let row = NewScheduledInterview {
            title: "Backend Engineer Interview".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 28),
            time: "10:30".into(),
            ..Default::default()
        }
        .into_row(Utc::now());
        assert_eq!(row.status, Some(InterviewStatus::Scheduled));
    }
}
