//! Record store adapter: the only path from services to persisted records.
//!
//! `RecordStore` mirrors the hosted backend's field-described CRUD contract. Two
//! implementations exist: `MemoryStore` for development and tests, `RemoteStore` for the
//! hosted backend. The backend is chosen once at startup by `build_store`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

use crate::config::{Config, StoreBackend};

pub mod memory;
pub mod query;
pub mod remote;
pub mod repository;

pub use memory::MemoryStore;
pub use query::{Condition, FetchParams, Operator, SortType};
pub use remote::RemoteStore;
pub use repository::{Entity, Repository};

/// Store-assigned identifier. Always positive.
pub type RecordId = i64;

/// A single record in store shape (snake_case columns plus `Id` and `Name`).
pub type Record = Map<String, Value>;

/// Per-record result code used when a bulk call targets an id that does not exist.
pub const NOT_FOUND_CODE: &str = "NOT_FOUND";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Malformed {collection} record: {reason}")]
    Malformed { collection: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Envelope returned by every store call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<RecordResult>>,
}

impl StoreResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn with_results(results: Vec<RecordResult>) -> Self {
        Self {
            success: true,
            results: Some(results),
            ..Default::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Outcome for one record of a bulk create/update/delete call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl RecordResult {
    pub fn success(data: Option<Value>) -> Self {
        Self {
            success: true,
            data,
            message: None,
            code: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            code: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: Some(NOT_FOUND_CODE.to_string()),
            ..Self::failure(message)
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code.as_deref() == Some(NOT_FOUND_CODE)
    }
}

/// Field-described CRUD against named record collections.
///
/// A transport failure is an `Err`; a request the store understood but refused comes back
/// as `Ok` with `success: false` or with failed entries in `results`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_records(
        &self,
        collection: &str,
        params: &FetchParams,
    ) -> Result<StoreResponse, StoreError>;

    async fn get_record_by_id(
        &self,
        collection: &str,
        id: RecordId,
        params: &FetchParams,
    ) -> Result<StoreResponse, StoreError>;

    async fn create_records(
        &self,
        collection: &str,
        records: Vec<Record>,
    ) -> Result<StoreResponse, StoreError>;

    async fn update_records(
        &self,
        collection: &str,
        records: Vec<Record>,
    ) -> Result<StoreResponse, StoreError>;

    async fn delete_records(
        &self,
        collection: &str,
        ids: &[RecordId],
    ) -> Result<StoreResponse, StoreError>;

    /// Short name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;
}

/// Builds the record store selected by `STORE_BACKEND`.
pub fn build_store(config: &Config) -> Result<Arc<dyn RecordStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            let latency = Duration::from_millis(config.simulated_latency_ms);
            info!(
                "Using in-memory record store (simulated latency {}ms)",
                latency.as_millis()
            );
            Ok(Arc::new(MemoryStore::with_latency(latency)))
        }
        StoreBackend::Remote => {
            let remote = config.remote_store.as_ref().ok_or_else(|| {
                anyhow::anyhow!("remote store selected but RECORD_STORE_* settings are missing")
            })?;
            info!("Using remote record store at {}", remote.base_url);
            Ok(Arc::new(RemoteStore::new(remote)?))
        }
    }
}
