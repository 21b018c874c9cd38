use chrono::NaiveTime;

use crate::errors::FieldErrors;
use crate::models::interview::{
    InterviewNotePatch, InterviewQuestionPatch, NewInterviewNote, NewInterviewQuestion,
    NewScheduledInterview, ScheduledInterviewPatch,
};
use crate::validation::{require_text, require_text_if_present};

const TITLE_REQUIRED: &str = "Title is required";
const COMPANY_REQUIRED: &str = "Company is required";
const POSITION_REQUIRED: &str = "Position is required";
const CONTENT_REQUIRED: &str = "Content is required";
const QUESTION_REQUIRED: &str = "Question is required";
const TIME_REQUIRED: &str = "Interview time is required";
const TIME_FORMAT: &str = "Interview time must be HH:MM";

pub fn validate_note(draft: &NewInterviewNote) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_text(&mut errors, "title", &draft.title, TITLE_REQUIRED);
    require_text(&mut errors, "company", &draft.company, COMPANY_REQUIRED);
    require_text(&mut errors, "position", &draft.position, POSITION_REQUIRED);
    require_text(&mut errors, "content", &draft.content, CONTENT_REQUIRED);
    errors
}

pub fn validate_note_patch(patch: &InterviewNotePatch) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_text_if_present(&mut errors, "title", patch.title.as_deref(), TITLE_REQUIRED);
    require_text_if_present(&mut errors, "company", patch.company.as_deref(), COMPANY_REQUIRED);
    require_text_if_present(
        &mut errors,
        "position",
        patch.position.as_deref(),
        POSITION_REQUIRED,
    );
    require_text_if_present(&mut errors, "content", patch.content.as_deref(), CONTENT_REQUIRED);
    errors
}

pub fn validate_question(draft: &NewInterviewQuestion) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_text(&mut errors, "question", &draft.question, QUESTION_REQUIRED);
    errors
}

pub fn validate_question_patch(patch: &InterviewQuestionPatch) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_text_if_present(
        &mut errors,
        "question",
        patch.question.as_deref(),
        QUESTION_REQUIRED,
    );
    errors
}

pub fn validate_scheduled_interview(draft: &NewScheduledInterview) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_text(&mut errors, "title", &draft.title, TITLE_REQUIRED);
    require_text(&mut errors, "company", &draft.company, COMPANY_REQUIRED);
    if draft.date.is_none() {
        errors.add("date", "Interview date is required");
    }
    require_text(&mut errors, "time", &draft.time, TIME_REQUIRED);
    check_time(&mut errors, &draft.time);
    errors
}

pub fn validate_scheduled_interview_patch(patch: &ScheduledInterviewPatch) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_text_if_present(&mut errors, "title", patch.title.as_deref(), TITLE_REQUIRED);
    require_text_if_present(&mut errors, "company", patch.company.as_deref(), COMPANY_REQUIRED);
    if let Some(time) = &patch.time {
        require_text(&mut errors, "time", time, TIME_REQUIRED);
        check_time(&mut errors, time);
    }
    errors
}

fn check_time(errors: &mut FieldErrors, time: &str) {
    let time = time.trim();
    if !time.is_empty() && NaiveTime::parse_from_str(time, "%H:%M").is_err() {
        errors.add("time", TIME_FORMAT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_note_requires_all_text_fields() {
        let errors = validate_note(&NewInterviewNote {
            title: "Onsite".into(),
            ..Default::default()
        });
        assert!(!errors.contains("title"));
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("content"), Some(CONTENT_REQUIRED));
    }

    #[test]
    fn test_question_only_requires_question_text() {
        assert!(validate_question(&NewInterviewQuestion {
            question: "Walk me through your resume".into(),
            ..Default::default()
        })
        .is_empty());
        assert!(validate_question(&NewInterviewQuestion::default()).contains("question"));
    }

    #[test]
    fn test_scheduled_interview_checks_date_and_time() {
        let errors = validate_scheduled_interview(&NewScheduledInterview {
            title: "Final round".into(),
            company: "Acme".into(),
            time: "25:99".into(),
            ..Default::default()
        });
        assert!(errors.contains("date"));
        assert_eq!(errors.get("time"), Some(TIME_FORMAT));

        let ok = validate_scheduled_interview(&NewScheduledInterview {
            title: "Final round".into(),
            company: "Acme".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 28),
            time: "10:30".into(),
            ..Default::default()
        });
        assert!(ok.is_empty());
    }

    #[test]
    fn test_patches_check_only_present_fields() {
        assert!(validate_note_patch(&InterviewNotePatch::default()).is_empty());
        assert!(validate_question_patch(&InterviewQuestionPatch {
            question: Some("".into()),
            ..Default::default()
        })
        .contains("question"));
        assert!(validate_scheduled_interview_patch(&ScheduledInterviewPatch {
            time: Some("noon".into()),
            ..Default::default()
        })
        .contains("time"));
    }
}
