use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_opt_datetime;
use crate::store::{Entity, RecordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Interview,
    FollowUp,
    Deadline,
    PhoneScreen,
    ThankYou,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::Interview => "interview",
            ReminderKind::FollowUp => "follow_up",
            ReminderKind::Deadline => "deadline",
            ReminderKind::PhoneScreen => "phone_screen",
            ReminderKind::ThankYou => "thank_you",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub application_id: Option<RecordId>,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: ReminderKind,
    pub message: String,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReminder {
    pub application_id: Option<RecordId>,
    #[serde(default, deserialize_with = "deserialize_opt_datetime")]
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: Option<ReminderKind>,
    #[serde(default)]
    pub message: String,
    pub priority: Option<Priority>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPatch {
    pub application_id: Option<RecordId>,
    #[serde(default, deserialize_with = "deserialize_opt_datetime")]
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: Option<ReminderKind>,
    pub message: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderRow {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReminderKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<RecordId>,
}

impl Entity for Reminder {
    const COLLECTION: &'static str = "reminder";
    const LABEL: &'static str = "reminder";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "date",
        "type",
        "message",
        "priority",
        "completed",
        "created_at",
        "application_id",
    ];
    type Row = ReminderRow;

    fn from_row(row: ReminderRow) -> Result<Self, String> {
        let id = row.id.ok_or("missing Id")?;
        Ok(Reminder {
            id,
            application_id: row.application_id.filter(|app_id| *app_id > 0),
            date: row
                .date
                .ok_or_else(|| format!("reminder {id} has no date"))?,
            kind: row.kind.unwrap_or(ReminderKind::FollowUp),
            message: row.message.or(row.name).unwrap_or_default(),
            priority: row.priority.unwrap_or_default(),
            completed: row.completed.unwrap_or(false),
            created_at: row.created_at.unwrap_or_default(),
        })
    }
}

impl NewReminder {
    /// Defaults: type `follow_up`, priority `medium`, due now if no date was given.
    pub fn into_row(self, now: DateTime<Utc>) -> ReminderRow {
        let message = self.message.trim().to_string();
        ReminderRow {
            id: None,
            name: Some(message.clone()),
            date: Some(self.date.unwrap_or(now)),
            kind: Some(self.kind.unwrap_or(ReminderKind::FollowUp)),
            message: Some(message),
            priority: Some(self.priority.unwrap_or_default()),
            completed: Some(self.completed),
            created_at: Some(now),
            application_id: self.application_id,
        }
    }
}

impl ReminderPatch {
    pub fn into_row(self) -> ReminderRow {
        let message = self.message.map(|m| m.trim().to_string());
        ReminderRow {
            id: None,
            name: message.clone(),
            date: self.date,
            kind: self.kind,
            message,
            priority: self.priority,
            completed: self.completed,
            created_at: None,
            application_id: self.application_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_reminder_accepts_datetime_local_input() {
        let draft: NewReminder = serde_json::from_value(json!({
            "message": "Follow up with recruiter",
            "date": "2030-05-01T09:30",
            "type": "follow_up",
            "applicationId": 7
        }))
        .unwrap();
        assert_eq!(
            draft.date.unwrap(),
            "2030-05-01T09:30:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert_eq!(draft.application_id, Some(7));
    }

    #[test]
    fn test_new_reminder_defaults() {
        let now = Utc::now();
        let row = NewReminder {
            message: "Send thank-you note".into(),
            ..Default::default()
        }
        .into_row(now);
        assert_eq!(row.kind, Some(ReminderKind::FollowUp));
        assert_eq!(row.priority, Some(Priority::Medium));
        assert_eq!(row.completed, Some(false));
        assert_eq!(row.application_id, None);
    }

    #[test]
    fn test_row_without_date_is_rejected() {
        let row: ReminderRow = serde_json::from_value(json!({"Id": 2, "message": "x"})).unwrap();
        assert!(Reminder::from_row(row).is_err());
    }
}
