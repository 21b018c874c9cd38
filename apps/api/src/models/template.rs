use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{join_list, split_list};
use crate::store::{Entity, RecordId};

pub const DEFAULT_TEMPLATE_CATEGORY: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterTemplate {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub name: String,
    pub category: String,
    pub subject: String,
    pub content: String,
    /// `{placeholder}` names found in content and subject.
    pub variables: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplate {
    #[serde(default)]
    pub name: String,
    pub category: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub subject: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateRow {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Comma-joined variable names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for CoverLetterTemplate {
    const COLLECTION: &'static str = "cover_letter_template";
    const LABEL: &'static str = "template";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "category",
        "subject",
        "content",
        "variables",
        "created_at",
        "updated_at",
    ];
    type Row = TemplateRow;

    fn from_row(row: TemplateRow) -> Result<Self, String> {
        let created_at = row.created_at.unwrap_or_default();
        Ok(CoverLetterTemplate {
            id: row.id.ok_or("missing Id")?,
            name: row.name.unwrap_or_default(),
            category: row
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_TEMPLATE_CATEGORY.to_string()),
            subject: row.subject.unwrap_or_default(),
            content: row.content.unwrap_or_default(),
            variables: row.variables.as_deref().map(split_list).unwrap_or_default(),
            created_at,
            updated_at: row.updated_at.unwrap_or(created_at),
        })
    }
}

fn placeholder_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\{([^},]+)\}").ok())
        .as_ref()
}

/// Distinct `{name}` placeholders, content first then subject, in order of first appearance.
/// Braces holding a comma are not placeholders; the stored list is comma-joined.
pub fn extract_variables(content: &str, subject: &str) -> Vec<String> {
    let Some(re) = placeholder_pattern() else {
        return Vec::new();
    };
    let text = format!("{content} {subject}");
    let mut variables: Vec<String> = Vec::new();
    for cap in re.captures_iter(&text) {
        let Some(name) = cap.get(1).map(|m| m.as_str().trim()) else {
            continue;
        };
        if !name.is_empty() && !variables.iter().any(|v| v == name) {
            variables.push(name.to_string());
        }
    }
    variables
}

fn normalize_category(category: Option<String>) -> String {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_TEMPLATE_CATEGORY.to_string())
}

impl NewTemplate {
    pub fn into_row(self, now: DateTime<Utc>) -> TemplateRow {
        let variables = extract_variables(&self.content, &self.subject);
        TemplateRow {
            id: None,
            name: Some(self.name.trim().to_string()),
            category: Some(normalize_category(self.category)),
            subject: Some(self.subject),
            content: Some(self.content),
            variables: Some(join_list(&variables)),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

impl TemplatePatch {
    /// Merges the patch over `current` and recomputes the variable list.
    pub fn merge_into_row(self, current: &CoverLetterTemplate, now: DateTime<Utc>) -> TemplateRow {
        let subject = self.subject.unwrap_or_else(|| current.subject.clone());
        let content = self.content.unwrap_or_else(|| current.content.clone());
        let variables = extract_variables(&content, &subject);
        TemplateRow {
            id: None,
            name: Some(
                self.name
                    .map(|n| n.trim().to_string())
                    .unwrap_or_else(|| current.name.clone()),
            ),
            category: Some(match self.category {
                Some(category) => normalize_category(Some(category)),
                None => current.category.clone(),
            }),
            subject: Some(subject),
            content: Some(content),
            variables: Some(join_list(&variables)),
            created_at: None,
            updated_at: Some(now),
        }
    }
}
