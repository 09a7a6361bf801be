//! Backed mode: a search-index document store driven over REST.
//!
//! # Responsibilities
//! - Establish connectivity (first answering endpoint wins)
//! - Ensure the observation index and its mapping exist before any write
//! - Translate the store contract into index/search requests
//!
//! # Design Decisions
//! - Writes use `?refresh=true` so a persisted observation is immediately
//!   visible to the query that follows it
//! - A missing index on the read path yields empty results, not an error
//! - Documents that no longer decode as observations are skipped with a
//!   warning instead of poisoning the whole response

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::StoreConfig;
use crate::model::{self, Observation};
use crate::store::{ObservationStore, PutReceipt, StoreError, StoreMode, LIST_LIMIT};

/// Store backend talking to an Elasticsearch-compatible endpoint.
pub struct IndexedStore {
    client: Client,
    base: String,
    index: String,
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndexResponse {
    #[serde(rename = "_id")]
    id: String,
    result: String,
}

impl IndexedStore {
    /// Try each configured endpoint in order; the first one that answers a
    /// ping is kept. Ensures the index exists before returning.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;

        let mut last_error = "no endpoints configured".to_string();
        for endpoint in &config.endpoints {
            let candidate = Self {
                client: client.clone(),
                base: endpoint.trim_end_matches('/').to_string(),
                index: config.index.clone(),
                username: config.username.clone(),
                password: config.password.clone(),
            };

            match candidate.ping().await {
                Ok(()) => {
                    candidate.ensure_index().await?;
                    return Ok(candidate);
                }
                Err(e) => {
                    tracing::debug!(endpoint = %endpoint, error = %e, "Store endpoint did not answer");
                    last_error = e;
                }
            }
        }

        Err(StoreError::Unreachable(last_error))
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(user) => builder.basic_auth(user, self.password.as_deref()),
            None => builder,
        }
    }

    async fn ping(&self) -> Result<(), String> {
        let response = self
            .authed(self.client.get(format!("{}/", self.base)))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("{} answered {}", self.base, response.status()))
        }
    }

    async fn ensure_index(&self) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.base, self.index);
        let head = self
            .authed(self.client.head(&url))
            .send()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if head.status().is_success() {
            return Ok(());
        }
        if head.status() != StatusCode::NOT_FOUND {
            return Err(StoreError::Query(format!(
                "index check answered {}",
                head.status()
            )));
        }

        let created = self
            .authed(self.client.put(&url))
            .json(&index_mapping())
            .send()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        if !created.status().is_success() {
            return Err(StoreError::Query(format!(
                "index creation answered {}",
                created.status()
            )));
        }

        tracing::info!(index = %self.index, "Created observation index");
        Ok(())
    }

    async fn search(&self, body: Value) -> Result<Vec<Observation>, StoreError> {
        let url = format!("{}/{}/_search", self.base, self.index);
        let response = self
            .authed(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::warn!(index = %self.index, "Observation index missing; returning no records");
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(StoreError::Query(format!(
                "search answered {}",
                response.status()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let hits = payload["hits"]["hits"].as_array().cloned().unwrap_or_default();

        let observations = hits
            .into_iter()
            .filter_map(|hit| {
                let source = hit.get("_source")?.clone();
                match serde_json::from_value::<Observation>(source) {
                    Ok(observation) => Some(observation),
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping undecodable record");
                        None
                    }
                }
            })
            .collect();
        Ok(observations)
    }
}

#[async_trait]
impl ObservationStore for IndexedStore {
    async fn put(&self, mut observation: Observation) -> Result<PutReceipt, StoreError> {
        observation.set_timestamp_if_missing(model::now_rfc3339());

        let url = format!("{}/{}/_doc?refresh=true", self.base, self.index);
        let response = self
            .authed(self.client.post(&url))
            .json(&observation)
            .send()
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Write(format!(
                "backend answered {}",
                response.status()
            )));
        }

        let body: IndexResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;

        tracing::debug!(id = %body.id, "Indexed observation");
        Ok(PutReceipt {
            id: body.id,
            result: body.result,
            mode: StoreMode::Indexed,
        })
    }

    async fn list_all(&self) -> Result<Vec<Observation>, StoreError> {
        self.search(json!({
            "query": { "match_all": {} },
            "sort": [{ "timestamp": { "order": "desc" } }],
            "size": LIST_LIMIT,
        }))
        .await
    }

    async fn find_latest_by_name(&self, name: &str) -> Result<Option<Observation>, StoreError> {
        let found = self
            .search(json!({
                "query": {
                    "bool": {
                        "should": [
                            { "term": { "service_name": name } },
                            { "term": { "application_name": name } }
                        ]
                    }
                },
                "sort": [{ "timestamp": { "order": "desc" } }],
                "size": 1,
            }))
            .await?;
        Ok(found.into_iter().next())
    }

    fn mode(&self) -> StoreMode {
        StoreMode::Indexed
    }
}

/// Mapping installed when the index is first created. Subjects and
/// statuses are keywords (exact match), timestamps are dates, and the
/// embedded dependent services are nested documents.
fn index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "service_name": { "type": "keyword" },
                "application_name": { "type": "keyword" },
                "service_status": { "type": "keyword" },
                "application_status": { "type": "keyword" },
                "host_name": { "type": "keyword" },
                "timestamp": { "type": "date" },
                "dependent_services": {
                    "type": "nested",
                    "properties": {
                        "service_name": { "type": "keyword" },
                        "service_status": { "type": "keyword" },
                        "host_name": { "type": "keyword" }
                    }
                }
            }
        }
    })
}
