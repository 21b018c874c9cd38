use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{join_list, parse_id_list};
use crate::store::{Entity, RecordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Resume,
    CoverLetter,
    Portfolio,
    Certificate,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Resume => "resume",
            DocumentType::CoverLetter => "cover_letter",
            DocumentType::Portfolio => "portfolio",
            DocumentType::Certificate => "certificate",
            DocumentType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub filename: String,
    pub version: i32,
    pub upload_date: DateTime<Utc>,
    pub content: String,
    /// Loose association; ids are not checked against existing applications.
    pub application_ids: Vec<RecordId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    #[serde(rename = "type")]
    pub doc_type: Option<DocumentType>,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub application_ids: Vec<RecordId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    #[serde(rename = "type")]
    pub doc_type: Option<DocumentType>,
    pub filename: Option<String>,
    pub content: Option<String>,
    pub application_ids: Option<Vec<RecordId>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentRow {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<DocumentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Comma-joined application ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_ids: Option<String>,
}

impl Entity for Document {
    const COLLECTION: &'static str = "document";
    const LABEL: &'static str = "document";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "type",
        "filename",
        "version",
        "upload_date",
        "content",
        "application_ids",
    ];
    type Row = DocumentRow;

    fn from_row(row: DocumentRow) -> Result<Self, String> {
        Ok(Document {
            id: row.id.ok_or("missing Id")?,
            doc_type: row.doc_type.unwrap_or(DocumentType::Other),
            filename: row.filename.or(row.name).unwrap_or_default(),
            version: row.version.unwrap_or(1),
            upload_date: row.upload_date.unwrap_or_default(),
            content: row.content.unwrap_or_default(),
            application_ids: row
                .application_ids
                .as_deref()
                .map(parse_id_list)
                .unwrap_or_default(),
        })
    }
}

impl NewDocument {
    /// New documents start at version 1 with an upload date of `now`.
    pub fn into_row(self, now: DateTime<Utc>) -> DocumentRow {
        let filename = self.filename.trim().to_string();
        DocumentRow {
            id: None,
            name: Some(filename.clone()),
            doc_type: Some(self.doc_type.unwrap_or(DocumentType::Other)),
            filename: Some(filename),
            version: Some(1),
            upload_date: Some(now),
            content: Some(self.content),
            application_ids: Some(join_list(&self.application_ids)),
        }
    }
}

impl DocumentPatch {
    pub fn into_row(self) -> DocumentRow {
        let filename = self.filename.map(|f| f.trim().to_string());
        DocumentRow {
            id: None,
            name: filename.clone(),
            doc_type: self.doc_type,
            filename,
            version: None,
            upload_date: None,
            content: self.content,
            application_ids: self.application_ids.map(|ids| join_list(&ids)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_application_ids_round_trip_through_list_column() {
        let row = NewDocument {
            doc_type: Some(DocumentType::Resume),
            filename: "resume.pdf".into(),
            content: String::new(),
            application_ids: vec![3, 12],
        }
        .into_row(Utc::now());
        assert_eq!(row.application_ids.as_deref(), Some("3,12"));

        let stored = DocumentRow {
            id: Some(1),
            ..row
        };
        let doc = Document::from_row(stored).unwrap();
        assert_eq!(doc.application_ids, vec![3, 12]);
        assert_eq!(doc.version, 1);
    }

    #[test]
    fn test_type_field_is_named_type_on_the_wire() {
        let patch: DocumentPatch = serde_json::from_value(json!({"type": "portfolio"})).unwrap();
        assert_eq!(patch.doc_type, Some(DocumentType::Portfolio));
        let row = serde_json::to_value(patch.into_row()).unwrap();
        assert_eq!(row, json!({"type": "portfolio"}));
    }
}
