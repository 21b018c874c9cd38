use chrono::{DateTime, Utc};

use crate::errors::FieldErrors;
use crate::models::reminder::{NewReminder, ReminderPatch};
use crate::validation::{require_text, require_text_if_present};

const MESSAGE_REQUIRED: &str = "Reminder message is required";
const DATE_REQUIRED: &str = "Reminder date and time is required";
const DATE_IN_PAST: &str = "Reminder date must be in the future";

pub fn validate_reminder(draft: &NewReminder, now: DateTime<Utc>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_text(&mut errors, "message", &draft.message, MESSAGE_REQUIRED);
    match draft.date {
        None => errors.add("date", DATE_REQUIRED),
        Some(date) => check_future(&mut errors, date, now),
    }
    if draft.kind.is_none() {
        errors.add("type", "Reminder type is required");
    }
    errors
}

/// A rescheduled reminder must still land in the future.
pub fn validate_reminder_patch(patch: &ReminderPatch, now: DateTime<Utc>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_text_if_present(
        &mut errors,
        "message",
        patch.message.as_deref(),
        MESSAGE_REQUIRED,
    );
    if let Some(date) = patch.date {
        check_future(&mut errors, date, now);
    }
    errors
}

fn check_future(errors: &mut FieldErrors, date: DateTime<Utc>, now: DateTime<Utc>) {
    if date <= now {
        errors.add("date", DATE_IN_PAST);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::models::reminder::ReminderKind;

    fn now() -> DateTime<Utc> {
        "2024-03-01T12:00:00Z".parse().unwrap()
    }

    fn valid() -> NewReminder {
        NewReminder {
            message: "Follow up with recruiter".into(),
            date: Some(now() + Duration::days(1)),
            kind: Some(ReminderKind::FollowUp),
            ..Default::default()
        }
    }

    #[test]
    fn test_future_reminder_passes() {
        assert!(validate_reminder(&valid(), now()).is_empty());
    }

    #[test]
    fn test_date_must_be_strictly_after_now() {
        for date in [now(), now() - Duration::minutes(1)] {
            let draft = NewReminder {
                date: Some(date),
                ..valid()
            };
            let errors = validate_reminder(&draft, now());
            assert_eq!(errors.get("date"), Some(DATE_IN_PAST));
        }
    }

    #[test]
    fn test_missing_fields() {
        let errors = validate_reminder(&NewReminder::default(), now());
        assert_eq!(errors.get("message"), Some(MESSAGE_REQUIRED));
        assert_eq!(errors.get("date"), Some(DATE_REQUIRED));
        assert_eq!(errors.get("type"), Some("Reminder type is required"));
    }

    #[test]
    fn test_patch_marking_complete_needs_no_date() {
        let patch = ReminderPatch {
            completed: Some(true),
            ..Default::default()
        };
        assert!(validate_reminder_patch(&patch, now()).is_empty());

        let moved_back = ReminderPatch {
            date: Some(now() - Duration::days(1)),
            ..Default::default()
        };
        assert!(validate_reminder_patch(&moved_back, now()).contains("date"));
    }
}
