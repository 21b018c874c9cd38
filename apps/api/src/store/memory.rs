use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    FetchParams, Record, RecordId, RecordResult, RecordStore, StoreError, StoreResponse,
};

#[derive(Debug, Default)]
struct Collection {
    rows: BTreeMap<RecordId, Record>,
    /// Highest id ever assigned. Ids are never reused after a delete.
    last_id: RecordId,
}

impl Collection {
    fn next_id(&mut self) -> RecordId {
        self.last_id += 1;
        self.last_id
    }
}

/// In-process record store with the same response contract as the hosted backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    latency: Duration,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `latency` before touching the data.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn project(row: &Record, params: &FetchParams) -> Record {
    if params.fields.is_empty() {
        return row.clone();
    }
    let mut projected = Record::new();
    if let Some(id) = row.get("Id") {
        projected.insert("Id".to_string(), id.clone());
    }
    for name in params.field_names() {
        if let Some(value) = row.get(name) {
            projected.insert(name.to_string(), value.clone());
        }
    }
    projected
}

fn record_id(record: &Record) -> Option<RecordId> {
    let id = match record.get("Id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    id.filter(|id| *id > 0)
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_records(
        &self,
        collection: &str,
        params: &FetchParams,
    ) -> Result<StoreResponse, StoreError> {
        self.simulate_latency().await;
        let collections = self.collections.read().await;

        let mut rows: Vec<&Record> = collections
            .get(collection)
            .map(|c| c.rows.values().filter(|row| params.matches(row)).collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| params.compare_records(a, b));

        debug!(collection, matched = rows.len(), "memory fetch");
        let data = rows.into_iter().map(|row| Value::Object(project(row, params)));
        Ok(StoreResponse::ok(Value::Array(data.collect())))
    }

    async fn get_record_by_id(
        &self,
        collection: &str,
        id: RecordId,
        params: &FetchParams,
    ) -> Result<StoreResponse, StoreError> {
        self.simulate_latency().await;
        let collections = self.collections.read().await;
        let row = collections.get(collection).and_then(|c| c.rows.get(&id));
        Ok(match row {
            Some(row) => StoreResponse::ok(Value::Object(project(row, params))),
            None => StoreResponse {
                success: true,
                ..Default::default()
            },
        })
    }

    async fn create_records(
        &self,
        collection: &str,
        records: Vec<Record>,
    ) -> Result<StoreResponse, StoreError> {
        self.simulate_latency().await;
        let mut collections = self.collections.write().await;
        let target = collections.entry(collection.to_string()).or_default();

        let results = records
            .into_iter()
            .map(|mut record| {
                let id = target.next_id();
                record.insert("Id".to_string(), Value::from(id));
                target.rows.insert(id, record.clone());
                debug!(collection, id, "memory create");
                RecordResult::success(Some(Value::Object(record)))
            })
            .collect();

        Ok(StoreResponse::with_results(results))
    }

    async fn update_records(
        &self,
        collection: &str,
        records: Vec<Record>,
    ) -> Result<StoreResponse, StoreError> {
        self.simulate_latency().await;
        let mut collections = self.collections.write().await;
        let target = collections.entry(collection.to_string()).or_default();

        let results = records
            .into_iter()
            .map(|patch| {
                let Some(id) = record_id(&patch) else {
                    return RecordResult::failure("Record is missing a valid Id");
                };
                let Some(existing) = target.rows.get_mut(&id) else {
                    return RecordResult::not_found(format!("Record {id} not found in {collection}"));
                };
                for (key, value) in patch {
                    if key != "Id" {
                        existing.insert(key, value);
                    }
                }
                debug!(collection, id, "memory update");
                RecordResult::success(Some(Value::Object(existing.clone())))
            })
            .collect();

        Ok(StoreResponse::with_results(results))
    }

    async fn delete_records(
        &self,
        collection: &str,
        ids: &[RecordId],
    ) -> Result<StoreResponse, StoreError> {
        self.simulate_latency().await;
        let mut collections = self.collections.write().await;
        let target = collections.entry(collection.to_string()).or_default();

        let results = ids
            .iter()
            .map(|id| match target.rows.remove(id) {
                Some(_) => {
                    debug!(collection, id, "memory delete");
                    RecordResult::success(None)
                }
                None => RecordResult::not_found(format!("Record {id} not found in {collection}")),
            })
            .collect();

        Ok(StoreResponse::with_results(results))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
