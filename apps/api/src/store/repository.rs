//! Typed repository over a `RecordStore`.
//!
//! Each entity declares its collection, its store-shaped row DTO and the conversion from
//! that row into the domain type. This is the single boundary where store field names
//! are decoded; services above it only see domain types.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use super::{FetchParams, Record, RecordId, RecordResult, RecordStore, StoreError, StoreResponse};

pub trait Entity: Sized + Send + Sync + 'static {
    /// Collection name in the record store.
    const COLLECTION: &'static str;
    /// Human label used in error messages ("application", "reminder", ...).
    const LABEL: &'static str;
    /// Store columns requested on every read.
    const FIELDS: &'static [&'static str];

    /// Store-shaped row. Absent optional fields are skipped when serialized so the same
    /// type carries both full records and partial updates.
    type Row: Serialize + DeserializeOwned + Send;

    fn from_row(row: Self::Row) -> Result<Self, String>;
}

pub struct Repository<E> {
    store: Arc<dyn RecordStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Fetch parameters pre-populated with the entity's field list.
    pub fn params(&self) -> FetchParams {
        FetchParams::with_fields(E::FIELDS)
    }

    pub async fn find(&self, params: FetchParams) -> Result<Vec<E>, StoreError> {
        let response = self.store.fetch_records(E::COLLECTION, &params).await?;
        let data = unwrap_response(response, &format!("Failed to fetch {}s", E::LABEL))?;

        let rows = match data {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(rows)) => rows,
            Some(_) => return Err(malformed::<E>("expected a list of records")),
        };
        debug!("Fetched {} {} record(s)", rows.len(), E::COLLECTION);
        rows.into_iter().map(decode::<E>).collect()
    }

    pub async fn get(&self, id: RecordId) -> Result<E, StoreError> {
        let response = self
            .store
            .get_record_by_id(E::COLLECTION, id, &self.params())
            .await?;
        let fallback = format!("{} {id} not found", capitalize(E::LABEL));
        match unwrap_response(response, &fallback)? {
            None | Some(Value::Null) => Err(StoreError::NotFound(fallback)),
            Some(value) => decode::<E>(value),
        }
    }

    pub async fn create(&self, row: E::Row) -> Result<E, StoreError> {
        let record = to_record::<E>(&row)?;
        let response = self
            .store
            .create_records(E::COLLECTION, vec![record])
            .await?;
        let created = single_result::<E>(response, "create")?
            .ok_or_else(|| malformed::<E>("store returned no record for create"))?;
        decode::<E>(created)
    }

    /// Merges the present fields of `row` into record `id`.
    pub async fn update(&self, id: RecordId, row: E::Row) -> Result<E, StoreError> {
        let mut record = to_record::<E>(&row)?;
        record.insert("Id".to_string(), Value::from(id));
        let response = self
            .store
            .update_records(E::COLLECTION, vec![record])
            .await?;
        match single_result::<E>(response, "update")? {
            Some(updated) => decode::<E>(updated),
            // Some stores acknowledge an update without echoing the record
            None => self.get(id).await,
        }
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        let response = self.store.delete_records(E::COLLECTION, &[id]).await?;
        single_result::<E>(response, "delete")?;
        Ok(())
    }
}

/// Surfaces `success: false` as an error and returns the response payload.
fn unwrap_response(response: StoreResponse, fallback: &str) -> Result<Option<Value>, StoreError> {
    if !response.success {
        return Err(StoreError::Rejected(
            response.message.unwrap_or_else(|| fallback.to_string()),
        ));
    }
    Ok(response.data)
}

/// Interprets the response of a single-record bulk call. Any failed entry fails the call
/// with the first failure's message; all failures are logged.
fn single_result<E: Entity>(
    response: StoreResponse,
    action: &str,
) -> Result<Option<Value>, StoreError> {
    let fallback = format!("Failed to {action} {}", E::LABEL);
    if !response.success {
        return Err(StoreError::Rejected(response.message.unwrap_or(fallback)));
    }

    let Some(results) = response.results else {
        return Ok(response.data);
    };

    let (succeeded, failed): (Vec<RecordResult>, Vec<RecordResult>) =
        results.into_iter().partition(|r| r.success);

    if let Some(first) = failed.first() {
        error!(
            "Failed to {action} {} {} record(s): {:?}",
            failed.len(),
            E::COLLECTION,
            failed
        );
        let message = first.message.clone().unwrap_or(fallback);
        return Err(if first.is_not_found() {
            StoreError::NotFound(message)
        } else {
            StoreError::Rejected(message)
        });
    }

    Ok(succeeded.into_iter().next().and_then(|r| r.data))
}

fn decode<E: Entity>(value: Value) -> Result<E, StoreError> {
    let row: E::Row =
        serde_json::from_value(value).map_err(|e| malformed::<E>(&e.to_string()))?;
    E::from_row(row).map_err(|reason| malformed::<E>(&reason))
}

fn to_record<E: Entity>(row: &E::Row) -> Result<Record, StoreError> {
    match serde_json::to_value(row)? {
        Value::Object(record) => Ok(record),
        _ => Err(malformed::<E>("row did not serialize to an object")),
    }
}

fn malformed<E: Entity>(reason: &str) -> StoreError {
    StoreError::Malformed {
        collection: E::COLLECTION.to_string(),
        reason: reason.to_string(),
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde::Deserialize;

    use crate::store::MemoryStore;

    #[derive(Debug, PartialEq)]
    struct Widget {
        id: RecordId,
        label: String,
    }

    #[derive(Serialize, Deserialize)]
    struct WidgetRow {
        #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
        id: Option<RecordId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    }

    impl Entity for Widget {
        const COLLECTION: &'static str = "widget";
        const LABEL: &'static str = "widget";
        const FIELDS: &'static [&'static str] = &["label"];
        type Row = WidgetRow;

        fn from_row(row: WidgetRow) -> Result<Self, String> {
            Ok(Widget {
                id: row.id.ok_or("missing Id")?,
                label: row.label.unwrap_or_default(),
            })
        }
    }

    fn row(label: &str) -> WidgetRow {
        WidgetRow {
            id: None,
            label: Some(label.to_string()),
        }
    }

    /// Store double that answers every call with a fixed response.
    struct CannedStore(StoreResponse);

    #[async_trait]
    impl RecordStore for CannedStore {
        async fn fetch_records(&self, _: &str, _: &FetchParams) -> Result<StoreResponse, StoreError> {
            Ok(self.0.clone())
        }
        async fn get_record_by_id(
            &self,
            _: &str,
            _: RecordId,
            _: &FetchParams,
        ) -> Result<StoreResponse, StoreError> {
            Ok(self.0.clone())
        }
        async fn create_records(&self, _: &str, _: Vec<Record>) -> Result<StoreResponse, StoreError> {
            Ok(self.0.clone())
        }
        async fn update_records(&self, _: &str, _: Vec<Record>) -> Result<StoreResponse, StoreError> {
            Ok(self.0.clone())
        }
        async fn delete_records(&self, _: &str, _: &[RecordId]) -> Result<StoreResponse, StoreError> {
            Ok(self.0.clone())
        }
        fn backend_name(&self) -> &'static str {
            "canned"
        }
    }

    fn canned(response: StoreResponse) -> Repository<Widget> {
        Repository::new(Arc::new(CannedStore(response)))
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let repo: Repository<Widget> = Repository::new(Arc::new(MemoryStore::new()));
        let created = repo.create(row("first")).await.unwrap();
        assert_eq!(created, Widget { id: 1, label: "first".into() });
        assert_eq!(repo.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let repo: Repository<Widget> = Repository::new(Arc::new(MemoryStore::new()));
        let created = repo.create(row("gone")).await.unwrap();
        repo.delete(created.id).await.unwrap();

        let err = repo.get(created.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref m) if m == "Widget 1 not found"));
        assert!(matches!(repo.delete(created.id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo: Repository<Widget> = Repository::new(Arc::new(MemoryStore::new()));
        let err = repo.update(5, row("x")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unsuccessful_response_surfaces_message() {
        let repo = canned(StoreResponse::failure("Project quota exceeded"));
        let err = repo.find(repo.params()).await.unwrap_err();
        assert_eq!(err.to_string(), "Project quota exceeded");
    }

    #[tokio::test]
    async fn test_unsuccessful_response_without_message_uses_fallback() {
        let repo = canned(StoreResponse {
            success: false,
            ..Default::default()
        });
        let err = repo.find(repo.params()).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch widgets");
    }

    #[tokio::test]
    async fn test_partial_failure_reports_first_failed_record() {
        let repo = canned(StoreResponse::with_results(vec![
            RecordResult::success(Some(serde_json::json!({"Id": 1}))),
            RecordResult::failure("label is too long"),
            RecordResult::failure("second failure"),
        ]));
        let err = repo.create(row("x")).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected(ref m) if m == "label is too long"));
    }

    #[tokio::test]
    async fn test_missing_id_is_malformed() {
        let repo = canned(StoreResponse::ok(serde_json::json!([{"label": "no id"}])));
        let err = repo.find(repo.params()).await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }
}
