//! Manufacturing API client
//!
//! Plain `GET` + JSON against the plant's work order service. Failures are
//! reported in-band through an `error` field, so bodies are decoded whatever
//! the HTTP status.

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::api::errors::ApiError;
use crate::api::types::*;
use crate::config::ApiConfig;

/// Lookups the station needs from the manufacturing system
#[async_trait]
pub trait ManufacturingApi: Send + Sync {
    /// Press and raw material item number for a work order
    async fn work_order(&self, work_order: &str) -> Result<WorkOrderInfo, ApiError>;

    /// Raw material item number for a material serial number (qualifier already stripped)
    async fn serial(&self, serial: &str) -> Result<SerialInfo, ApiError>;

    /// Work order the press is currently running, looked up from the one the loader started with
    async fn current_work_order(&self, work_order: &str) -> Result<String, ApiError>;
}

pub struct HttpManufacturingApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpManufacturingApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            message: format!("{base_url}: {e}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                message: format!("{base_url} cannot carry a path"),
            });
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::InvalidUrl {
                message: e.to_string(),
            })?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/{route}/{id}` with the id percent-encoded as one segment
    pub fn endpoint_url(&self, endpoint: Endpoint, id: &str) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                message: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .push(endpoint.route())
            .push(id);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint, id: &str) -> Result<(String, T), ApiError> {
        let url = self.endpoint_url(endpoint, id)?;
        let url_text = url.to_string();
        debug!(url = %url_text, "Requesting data from API");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::transport(&url_text, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(&url_text, e))?;
        let payload = serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url: url_text.clone(),
            message: format!("HTTP {status}: {e}"),
        })?;
        Ok((url_text, payload))
    }
}

fn required(value: Option<String>, url: &str, field: &'static str) -> Result<String, ApiError> {
    value.ok_or_else(|| ApiError::MissingField {
        url: url.to_string(),
        field,
    })
}

fn rejected(endpoint: Endpoint, id: &str) -> ApiError {
    ApiError::Rejected {
        endpoint,
        id: id.to_string(),
    }
}

#[async_trait]
impl ManufacturingApi for HttpManufacturingApi {
    async fn work_order(&self, work_order: &str) -> Result<WorkOrderInfo, ApiError> {
        let (url, payload): (_, WorkOrderPayload) = self.fetch(Endpoint::WorkOrder, work_order).await?;
        if flagged(&payload.error) {
            return Err(rejected(Endpoint::WorkOrder, work_order));
        }
        Ok(WorkOrderInfo {
            press: required(payload.press, &url, "press")?,
            raw_material: required(payload.rmat, &url, "rmat")?,
        })
    }

    async fn serial(&self, serial: &str) -> Result<SerialInfo, ApiError> {
        let (url, payload): (_, SerialPayload) = self.fetch(Endpoint::Serial, serial).await?;
        if flagged(&payload.error) {
            return Err(rejected(Endpoint::Serial, serial));
        }
        Ok(SerialInfo {
            item_number: required(payload.itemno, &url, "itemno")?,
        })
    }

    async fn current_work_order(&self, work_order: &str) -> Result<String, ApiError> {
        let (url, payload): (_, MonitorPayload) =
            self.fetch(Endpoint::WorkOrderMonitor, work_order).await?;
        if flagged(&payload.error) {
            return Err(rejected(Endpoint::WorkOrderMonitor, work_order));
        }
        required(payload.wo_id, &url, "wo_id")
    }
}
