use std::cmp::Ordering;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Record;

// ────────────────────────────────────────────────────────────────────────────
// Wire shape of a fetch request
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub field: FieldRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRef {
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    EqualTo,
    Contains,
    LessThanOrEqualTo,
    GreaterThanOrEqualTo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "FieldName")]
    pub field_name: String,
    #[serde(rename = "Operator")]
    pub operator: Operator,
    #[serde(rename = "Values")]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupOperator {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereGroup {
    pub operator: GroupOperator,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortType {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    pub sorttype: SortType,
}

/// Field list, filters and ordering for a fetch. Serializes to the store's wire shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchParams {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSpec>,
    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(rename = "whereGroups", default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<WhereGroup>,
    #[serde(rename = "orderBy", default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
}

impl Condition {
    pub fn new(field: &str, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field_name: field.to_string(),
            operator,
            values: vec![value.into()],
        }
    }

    pub fn equal_to(field: &str, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::EqualTo, value)
    }

    pub fn contains(field: &str, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Contains, value)
    }

    /// A record matches when any of `values` satisfies the operator.
    pub fn matches(&self, record: &Record) -> bool {
        let actual = record.get(&self.field_name).unwrap_or(&Value::Null);
        self.values
            .iter()
            .any(|expected| self.operator.test(actual, expected))
    }
}

impl Operator {
    fn test(self, actual: &Value, expected: &Value) -> bool {
        match self {
            Operator::EqualTo => loosely_equal(actual, expected),
            Operator::Contains => contains(actual, expected),
            Operator::LessThanOrEqualTo => {
                matches!(compare(actual, expected), Some(Ordering::Less | Ordering::Equal))
            }
            Operator::GreaterThanOrEqualTo => {
                matches!(
                    compare(actual, expected),
                    Some(Ordering::Greater | Ordering::Equal)
                )
            }
        }
    }
}

impl WhereGroup {
    pub fn any_of(conditions: Vec<Condition>) -> Self {
        Self {
            operator: GroupOperator::Or,
            conditions,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self.operator {
            GroupOperator::And => self.conditions.iter().all(|c| c.matches(record)),
            GroupOperator::Or => self.conditions.iter().any(|c| c.matches(record)),
        }
    }
}

impl FetchParams {
    pub fn with_fields(fields: &[&str]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|name| FieldSpec {
                    field: FieldRef {
                        name: name.to_string(),
                    },
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn any_of(mut self, conditions: Vec<Condition>) -> Self {
        self.groups.push(WhereGroup::any_of(conditions));
        self
    }

    pub fn order_by(mut self, field: &str, sorttype: SortType) -> Self {
        self.order_by.push(OrderBy {
            field_name: field.to_string(),
            sorttype,
        });
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field.name.as_str())
    }

    /// All plain conditions and every group must hold.
    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
            && self.groups.iter().all(|g| g.matches(record))
    }

    /// Orders records by each `orderBy` entry in turn. Missing values sort last.
    pub fn compare_records(&self, a: &Record, b: &Record) -> Ordering {
        for order in &self.order_by {
            let left = a.get(&order.field_name).unwrap_or(&Value::Null);
            let right = b.get(&order.field_name).unwrap_or(&Value::Null);
            let ordering = match (left.is_null(), right.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => return Ordering::Greater,
                (false, true) => return Ordering::Less,
                (false, false) => compare(left, right).unwrap_or(Ordering::Equal),
            };
            let ordering = match order.sorttype {
                SortType::Asc => ordering,
                SortType::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Value comparison
// ────────────────────────────────────────────────────────────────────────────

fn loosely_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::String(a), Value::Number(b)) | (Value::Number(b), Value::String(a)) => {
            a.trim() == b.to_string()
        }
        _ => actual == expected,
    }
}

/// Case-insensitive substring match on strings; element membership on arrays.
fn contains(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::String(haystack) => {
            let needle = match expected {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
        Value::Array(items) => items.iter().any(|item| loosely_equal(item, expected)),
        _ => false,
    }
}

/// Numbers compare numerically, RFC 3339 timestamps chronologically, other strings
/// lexically. Mixed or non-scalar values are incomparable.
fn compare(actual: &Value, expected: &Value) -> Option<Ordering> {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => {
            match (
                DateTime::parse_from_rfc3339(a),
                DateTime::parse_from_rfc3339(b),
            ) {
                (Ok(a), Ok(b)) => Some(a.cmp(&b)),
                _ => Some(a.cmp(b)),
            }
        }
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
