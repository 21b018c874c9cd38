use crate::errors::FieldErrors;
use crate::models::document::{DocumentPatch, NewDocument};
use crate::validation::{require_text, require_text_if_present};

const FILENAME_REQUIRED: &str = "Filename is required";

pub fn validate_document(draft: &NewDocument) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_text(&mut errors, "filename", &draft.filename, FILENAME_REQUIRED);
    errors
}

pub fn validate_document_patch(patch: &DocumentPatch) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_text_if_present(
        &mut errors,
        "filename",
        patch.filename.as_deref(),
        FILENAME_REQUIRED,
    );
    errors
}
