//! Remote patient table reached over a PostgREST-style HTTP interface.
//!
//! Rows live at `{url}/rest/v1/{table}`. Every request carries the service
//! key both as `apikey` and as a bearer token.

use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use super::{PatientStore, StoreError};
use crate::models::{Patient, PatientCreate};

/// Connection settings for `RestTableStore`.
#[derive(Debug, Clone, PartialEq)]
pub struct RestStoreConfig {
    pub url: String,
    pub key: String,
    pub table: String,
    pub timeout_secs: u64,
}

/// Error body shape returned by the store on non-2xx responses.
#[derive(Deserialize)]
struct RestErrorBody {
    message: String,
}

/// The store's `message` when the body carries one, else the raw body, else
/// the status reason when the body could not be read.
fn rejection_message(status: reqwest::StatusCode, body: Option<String>) -> String {
    match body {
        Some(body) => serde_json::from_str::<RestErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body),
        None => status
            .canonical_reason()
            .unwrap_or("unreadable response body")
            .to_string(),
    }
}

pub struct RestTableStore {
    base_url: String,
    table: String,
    key: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl RestTableStore {
    pub fn new(config: &RestStoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Client(e.to_string()))?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            table: config.table.clone(),
            key: config.key.clone(),
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    fn map_send_error(&self, e: reqwest::Error) -> StoreError {
        if e.is_connect() {
            StoreError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            StoreError::Timeout(self.timeout_secs)
        } else {
            StoreError::Client(e.to_string())
        }
    }

    /// Send and decode a row array, turning non-2xx into `Rejected`.
    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => Some(body),
                Err(e) => {
                    tracing::debug!(error = %e, "Failed to read patient store error body");
                    None
                }
            };
            let message = rejection_message(status, body);
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

impl PatientStore for RestTableStore {
    fn insert(&self, patient: PatientCreate) -> BoxFuture<'_, Result<Patient, StoreError>> {
        async move {
            let request = self
                .client
                .post(self.table_url())
                .header("Prefer", "return=representation")
                .json(&patient);
            let rows: Vec<Patient> = self.fetch_rows(request).await?;
            rows.into_iter().next().ok_or(StoreError::EmptyResponse)
        }
        .boxed()
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<Patient>, StoreError>> {
        async move {
            let request = self
                .client
                .get(self.table_url())
                .query(&[("select", "*")]);
            self.fetch_rows(request).await
        }
        .boxed()
    }

    fn get(&self, patient_id: Uuid) -> BoxFuture<'_, Result<Patient, StoreError>> {
        async move {
            let filter = format!("eq.{patient_id}");
            let request = self
                .client
                .get(self.table_url())
                .query(&[("select", "*"), ("patient_id", filter.as_str())]);
            let rows: Vec<Patient> = self.fetch_rows(request).await?;
            rows.into_iter().next().ok_or_else(|| StoreError::NotFound {
                entity_type: "patient".into(),
                id: patient_id.to_string(),
            })
        }
        .boxed()
    }

    fn backend(&self) -> &'static str {
        "remote"
    }
}
