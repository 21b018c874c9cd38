use std::cmp::Ordering;

use serde::Deserialize;

use crate::models::application::{ApplicationStatus, JobApplication};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    AppliedDate,
    Company,
    Title,
    Status,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query string of `GET /applications`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<ApplicationStatus>,
    #[serde(default)]
    pub sort: SortField,
    #[serde(default)]
    pub order: SortOrder,
}

/// Applies search, status filter and sort. Equal keys keep their input order.
pub fn filter_and_sort(apps: Vec<JobApplication>, query: &ListQuery) -> Vec<JobApplication> {
    let needle = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut apps: Vec<JobApplication> = apps
        .into_iter()
        .filter(|app| query.status.map_or(true, |status| app.status == status))
        .filter(|app| needle.as_deref().map_or(true, |n| matches_search(app, n)))
        .collect();

    apps.sort_by(|a, b| {
        let ordering = compare_by(a, b, query.sort);
        match query.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    apps
}

fn matches_search(app: &JobApplication, needle: &str) -> bool {
    [&app.title, &app.company, &app.location]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn compare_by(a: &JobApplication, b: &JobApplication, field: SortField) -> Ordering {
    match field {
        SortField::AppliedDate => a.applied_date.cmp(&b.applied_date),
        SortField::Company => a.company.to_lowercase().cmp(&b.company.to_lowercase()),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::models::application::{Salary, DEFAULT_CURRENCY};

    fn app(id: i64, title: &str, company: &str, status: ApplicationStatus, day: u32) -> JobApplication {
        let now = Utc::now();
        JobApplication {
            id,
            title: title.into(),
            company: company.into(),
            status,
            applied_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            salary: Salary {
                min: None,
                max: None,
                currency: DEFAULT_CURRENCY.into(),
            },
            location: if id % 2 == 0 { "Berlin".into() } else { "Remote".into() },
            notes: String::new(),
            job_url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn sample() -> Vec<JobApplication> {
        vec![
            app(1, "Engineer", "Acme", ApplicationStatus::Applied, 10),
            app(2, "Designer", "Globex", ApplicationStatus::Offer, 12),
            app(3, "Platform Engineer", "Initech", ApplicationStatus::Applied, 5),
            app(4, "Analyst", "acme labs", ApplicationStatus::Rejected, 12),
        ]
    }

    fn ids(apps: &[JobApplication]) -> Vec<i64> {
        apps.iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_default_is_newest_applied_date_first() {
        let sorted = filter_and_sort(sample(), &ListQuery::default());
        // 2 and 4 share a date; the stable sort keeps their input order
        assert_eq!(ids(&sorted), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_search_covers_title_company_and_location() {
        let by_company = filter_and_sort(
            sample(),
            &ListQuery {
                search: Some("ACME".into()),
                ..Default::default()
            },
        );
        assert_eq!(ids(&by_company), vec![4, 1]);

        let by_location = filter_and_sort(
            sample(),
            &ListQuery {
                search: Some("berlin".into()),
                ..Default::default()
            },
        );
        assert_eq!(ids(&by_location), vec![2, 4]);
    }

    #[test]
    fn test_status_filter_with_ascending_company_sort() {
        let sorted = filter_and_sort(
            sample(),
            &ListQuery {
                status: Some(ApplicationStatus::Applied),
                sort: SortField::Company,
                order: SortOrder::Asc,
                ..Default::default()
            },
        );
        assert_eq!(ids(&sorted), vec![1, 3]);
    }

    #[test]
    fn test_query_string_shape() {
        let query: ListQuery =
            serde_json::from_value(serde_json::json!({"sort": "appliedDate", "order": "asc"}))
                .unwrap();
        assert_eq!(query.sort, SortField::AppliedDate);
        assert_eq!(query.order, SortOrder::Asc);
        assert!(query.search.is_none());
    }
}
