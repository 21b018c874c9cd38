//! Shared field checks for form validation. Each domain module builds its own form rules
//! from these and reports them through `FieldErrors`.

use crate::errors::FieldErrors;

/// Records `message` under `field` when `value` is blank.
pub fn require_text(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

/// Same as `require_text` for a patch field: absent is fine, present-but-blank is not.
pub fn require_text_if_present(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    message: &str,
) {
    if let Some(value) = value {
        require_text(errors, field, value, message);
    }
}
