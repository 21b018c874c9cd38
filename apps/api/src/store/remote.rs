//! HTTP client for the hosted record store.
//!
//! Every call is a single request: no retries, no backoff. A non-2xx status becomes
//! `StoreError::Api`; a 2xx body is returned as-is for the repository to interpret.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{FetchParams, Record, RecordId, RecordStore, StoreError, StoreResponse};
use crate::config::RemoteStoreConfig;

#[derive(Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
    project_id: String,
    public_key: String,
}

impl RemoteStore {
    pub fn new(config: &RemoteStoreConfig) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(config.timeout_secs))
                .build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            public_key: config.public_key.clone(),
        })
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<StoreResponse, StoreError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("Record store call: {method} {url}");

        let response = self
            .client
            .request(method, &url)
            .header("x-project-id", &self.project_id)
            .header("x-public-key", &self.public_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Prefer the store's own message when the error body is an envelope
            let message = serde_json::from_str::<StoreResponse>(&body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or(body);
            warn!("Record store returned {status} for {url}: {message}");
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<StoreResponse>().await?)
    }
}

#[async_trait]
impl RecordStore for RemoteStore {
    async fn fetch_records(
        &self,
        collection: &str,
        params: &FetchParams,
    ) -> Result<StoreResponse, StoreError> {
        self.send(
            Method::POST,
            &format!("collections/{collection}/fetch"),
            params,
        )
        .await
    }

    async fn get_record_by_id(
        &self,
        collection: &str,
        id: RecordId,
        params: &FetchParams,
    ) -> Result<StoreResponse, StoreError> {
        self.send(
            Method::POST,
            &format!("collections/{collection}/records/{id}"),
            &json!({ "fields": params.fields }),
        )
        .await
    }

    async fn create_records(
        &self,
        collection: &str,
        records: Vec<Record>,
    ) -> Result<StoreResponse, StoreError> {
        self.send(
            Method::POST,
            &format!("collections/{collection}/records"),
            &json!({ "records": records }),
        )
        .await
    }

    async fn update_records(
        &self,
        collection: &str,
        records: Vec<Record>,
    ) -> Result<StoreResponse, StoreError> {
        self.send(
            Method::PUT,
            &format!("collections/{collection}/records"),
            &json!({ "records": records }),
        )
        .await
    }

    async fn delete_records(
        &self,
        collection: &str,
        ids: &[RecordId],
    ) -> Result<StoreResponse, StoreError> {
        self.send(
            Method::DELETE,
            &format!("collections/{collection}/records"),
            &json!({ "RecordIds": ids }),
        )
        .await
    }

    fn backend_name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::{delete, post},
        Json, Router,
    };
    use serde_json::Value;

    use crate::store::{Condition, RecordResult};

    /// Serves `router` on an ephemeral port and returns a client pointed at it.
    async fn spawn_store(router: Router) -> RemoteStore {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        RemoteStore::new(&RemoteStoreConfig {
            base_url: format!("http://{addr}/"),
            project_id: "proj-1".to_string(),
            public_key: "pk-1".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_credentials_and_wire_params() {
        let router = Router::new().route(
            "/collections/:collection/fetch",
            post(
                |Path(collection): Path<String>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    assert_eq!(headers["x-project-id"], "proj-1");
                    assert_eq!(headers["x-public-key"], "pk-1");
                    Json(StoreResponse::ok(serde_json::json!([
                        { "Id": 1, "collection": collection, "where": body["where"] }
                    ])))
                },
            ),
        );
        let store = spawn_store(router).await;

        let params = FetchParams::default().filter(Condition::equal_to("status", "offer"));
        let response = store.fetch_records("job_application", &params).await.unwrap();

        let data = response.data.unwrap();
        let row = &data[0];
        assert_eq!(row["collection"], "job_application");
        assert_eq!(row["where"][0]["FieldName"], "status");
    }

    #[tokio::test]
    async fn test_delete_passes_through_per_record_results() {
        let router = Router::new().route(
            "/collections/:collection/records",
            delete(|Json(body): Json<Value>| async move {
                assert_eq!(body["RecordIds"], serde_json::json!([12]));
                Json(StoreResponse::with_results(vec![RecordResult::not_found(
                    "Record 12 does not exist",
                )]))
            }),
        );
        let store = spawn_store(router).await;

        let response = store.delete_records("reminder", &[12]).await.unwrap();
        assert!(response.results.unwrap()[0].is_not_found());
    }

    #[tokio::test]
    async fn test_error_status_becomes_api_error() {
        let router = Router::new().route(
            "/collections/:collection/fetch",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(StoreResponse::failure("Invalid public key")),
                )
            }),
        );
        let store = spawn_store(router).await;

        let err = store
            .fetch_records("document", &FetchParams::default())
            .await
            .unwrap_err();
        match err {
            StoreError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid public key");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
