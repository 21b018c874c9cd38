use crate::errors::FieldErrors;
use crate::models::application::{ApplicationPatch, NewApplication, Salary, SalaryInput};
use crate::validation::{require_text, require_text_if_present};

const TITLE_REQUIRED: &str = "Job title is required";
const COMPANY_REQUIRED: &str = "Company name is required";
const SALARY_RANGE: &str = "Minimum salary cannot be greater than maximum";

pub fn validate_application(draft: &NewApplication) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_text(&mut errors, "title", &draft.title, TITLE_REQUIRED);
    require_text(&mut errors, "company", &draft.company, COMPANY_REQUIRED);
    if draft.status.is_none() {
        errors.add("status", "Status is required");
    }
    if draft.applied_date.is_none() {
        errors.add("appliedDate", "Applied date is required");
    }
    check_salary_range(&mut errors, &draft.salary);
    errors
}

/// Only fields present in the patch are checked.
pub fn validate_application_patch(patch: &ApplicationPatch) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_text_if_present(&mut errors, "title", patch.title.as_deref(), TITLE_REQUIRED);
    require_text_if_present(
        &mut errors,
        "company",
        patch.company.as_deref(),
        COMPANY_REQUIRED,
    );
    if let Some(salary) = &patch.salary {
        check_salary_range(&mut errors, salary);
    }
    errors
}

/// Range check for a salary patch merged over the stored bounds. A patch
/// cannot clear a bound, so an absent side keeps its stored value.
pub fn validate_merged_salary(current: &Salary, patch: &SalaryInput) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let merged = SalaryInput {
        min: patch.min.or(current.min),
        max: patch.max.or(current.max),
        currency: None,
    };
    check_salary_range(&mut errors, &merged);
    errors
}

fn check_salary_range(errors: &mut FieldErrors, salary: &SalaryInput) {
    if let (Some(min), Some(max)) = (salary.min, salary.max) {
        if min > max {
            errors.add("salaryRange", SALARY_RANGE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::application::ApplicationStatus;

    fn valid() -> NewApplication {
        NewApplication {
            title: "Engineer".into(),
            company: "Acme".into(),
            status: Some(ApplicationStatus::Applied),
            applied_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_application_passes() {
        assert!(validate_application(&valid()).is_empty());
    }

    #[test]
    fn test_missing_fields_are_reported_by_name() {
        let errors = validate_application(&NewApplication::default());
        assert_eq!(errors.get("title"), Some(TITLE_REQUIRED));
        assert_eq!(errors.get("company"), Some(COMPANY_REQUIRED));
        assert_eq!(errors.get("status"), Some("Status is required"));
        assert_eq!(errors.get("appliedDate"), Some("Applied date is required"));
        assert!(!errors.contains("salaryRange"));
    }

    #[test]
    fn test_inverted_salary_range_is_rejected() {
        let draft = NewApplication {
            salary: SalaryInput {
                min: Some(150_000),
                max: Some(100_000),
                currency: None,
            },
            ..valid()
        };
        let errors = validate_application(&draft);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("salaryRange"), Some(SALARY_RANGE));
    }

    #[test]
    fn test_one_sided_or_equal_salary_is_fine() {
        for (min, max) in [(Some(100), None), (None, Some(100)), (Some(100), Some(100))] {
            let draft = NewApplication {
                salary: SalaryInput {
                    min,
                    max,
                    currency: None,
                },
                ..valid()
            };
            assert!(validate_application(&draft).is_empty());
        }
    }

    #[test]
    fn test_one_sided_patch_is_checked_against_stored_bounds() {
        let stored = Salary {
            min: Some(50_000),
            max: Some(100_000),
            currency: "USD".into(),
        };
        let raise_min = SalaryInput {
            min: Some(200_000),
            ..Default::default()
        };
        let errors = validate_merged_salary(&stored, &raise_min);
        assert_eq!(errors.get("salaryRange"), Some(SALARY_RANGE));

        let raise_max = SalaryInput {
            max: Some(120_000),
            ..Default::default()
        };
        assert!(validate_merged_salary(&stored, &raise_max).is_empty());
    }

    #[test]
    fn test_patch_checks_only_present_fields() {
        assert!(validate_application_patch(&ApplicationPatch::default()).is_empty());

        let patch = ApplicationPatch {
            title: Some(" ".into()),
            salary: Some(SalaryInput {
                min: Some(2),
                max: Some(1),
                currency: None,
            }),
            ..Default::default()
        };
        let errors = validate_application_patch(&patch);
        assert!(errors.contains("title"));
        assert!(errors.contains("salaryRange"));
        assert!(!errors.contains("company"));
    }
}
