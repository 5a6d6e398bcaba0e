use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::traits::PriceApi;
use crate::errors::CoreError;
use crate::models::asset::{join_ids, AssetId};
use crate::models::price::{PriceSnapshot, RawPricePoint};
use crate::models::settings::DashboardSettings;

const PROVIDER: &str = "DashboardApi";
const PRICES_PATH: &str = "/api/crypto-prices";
const HISTORY_PATH: &str = "/api/crypto-historical-data";

/// HTTP client for the dashboard backend.
///
/// - **Prices**: `GET /api/crypto-prices?ids=bitcoin,ethereum` → JSON array
/// - **History**: `GET /api/crypto-historical-data?id=bitcoin` → `{ "prices": [[ms, price], ...] }`
/// - Either endpoint may answer `{ "error": "..." }` instead.
///
/// No auth headers are sent. Every request is bounded by the configured
/// timeout; expiry surfaces as `CoreError::Timeout`.
pub struct DashboardApiClient {
    client: Client,
    base_url: String,
}

impl DashboardApiClient {
    pub fn new(settings: &DashboardSettings) -> Result<Self, CoreError> {
        Self::with_timeout(&settings.base_url, settings.request_timeout)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Batch price URL for `ids`, comma-joined into a single `ids` param.
    pub fn prices_url(&self, ids: &[AssetId]) -> Result<Url, CoreError> {
        self.endpoint(PRICES_PATH, "ids", &join_ids(ids))
    }

    /// Historical series URL for a single asset.
    pub fn history_url(&self, id: &AssetId) -> Result<Url, CoreError> {
        self.endpoint(HISTORY_PATH, "id", id.as_str())
    }

    fn endpoint(&self, path: &str, key: &str, value: &str) -> Result<Url, CoreError> {
        let raw = format!("{}{path}", self.base_url);
        Url::parse_with_params(&raw, &[(key, value)])
            .map_err(|e| CoreError::ValidationError(format!("Invalid backend URL {raw}: {e}")))
    }

    /// Send a GET and hand back the raw status and body for decoding.
    async fn get(&self, url: Url) -> Result<(u16, String), CoreError> {
        debug!(url = %url, "backend request");
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok((status, body))
    }
}

// ── Backend response types ──────────────────────────────────────────

#[derive(Deserialize)]
struct HistoryResponse {
    prices: Vec<RawPricePoint>,
}

/// Turn a raw backend reply into data or a `CoreError`.
///
/// Checked in order: non-2xx status, then an `error` field in the JSON
/// body, then the expected shape.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, CoreError> {
    if !(200..300).contains(&status) {
        return Err(CoreError::HttpStatus(status));
    }

    let value: Value = serde_json::from_str(body)?;
    if let Some(message) = value.get("error").and_then(error_message) {
        return Err(CoreError::Api {
            provider: PROVIDER.into(),
            message,
        });
    }

    Ok(serde_json::from_value(value)?)
}

/// Decode a batch price reply.
pub fn decode_prices(status: u16, body: &str) -> Result<Vec<PriceSnapshot>, CoreError> {
    decode_response(status, body)
}

/// Decode a historical series reply.
pub fn decode_history(status: u16, body: &str) -> Result<Vec<RawPricePoint>, CoreError> {
    decode_response::<HistoryResponse>(status, body).map(|r| r.prices)
}

/// A present-but-falsy `error` field (null, false, "") is not an error.
fn error_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl PriceApi for DashboardApiClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn fetch_prices(&self, ids: &[AssetId]) -> Result<Vec<PriceSnapshot>, CoreError> {
        let (status, body) = self.get(self.prices_url(ids)?).await?;
        decode_prices(status, &body)
    }

    async fn fetch_history(&self, id: &AssetId) -> Result<Vec<RawPricePoint>, CoreError> {
        let (status, body) = self.get(self.history_url(id)?).await?;
        decode_history(status, &body)
    }
}
