use crate::errors::FieldErrors;
use crate::models::template::{NewTemplate, TemplatePatch};
use crate::validation::{require_text, require_text_if_present};

const NAME_REQUIRED: &str = "Template name is required";
const SUBJECT_REQUIRED: &str = "Subject is required";
const CONTENT_REQUIRED: &str = "Content is required";

pub fn validate_template(draft: &NewTemplate) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_text(&mut errors, "name", &draft.name, NAME_REQUIRED);
    require_text(&mut errors, "subject", &draft.subject, SUBJECT_REQUIRED);
    require_text(&mut errors, "content", &draft.content, CONTENT_REQUIRED);
    errors
}

pub fn validate_template_patch(patch: &TemplatePatch) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_text_if_present(&mut errors, "name", patch.name.as_deref(), NAME_REQUIRED);
    require_text_if_present(&mut errors, "subject", patch.subject.as_deref(), SUBJECT_REQUIRED);
    require_text_if_present(&mut errors, "content", patch.content.as_deref(), CONTENT_REQUIRED);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_requires_name_subject_content() {
        let errors = validate_template(&NewTemplate::default());
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("name"), Some(NAME_REQUIRED));

        let patch = TemplatePatch {
            category: Some("Tech".into()),
            ..Default::default()
        };
        assert!(validate_template_patch(&patch).is_empty());
    }
}
