use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::asset::AssetId;

/// Latest known market data for one asset, as relayed by the backend
/// from CoinGecko's `coins/markets` endpoint.
///
/// Upstream sends `null` for some numeric fields on thinly traded
/// coins, so everything except the current price is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub id: AssetId,
    pub name: String,
    pub symbol: String,
    /// Icon URL.
    pub image: String,
    pub current_price: f64,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// All-time-high price.
    #[serde(default)]
    pub ath: Option<f64>,
}

/// One raw `[timestamp_millis, price]` sample from the historical endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPricePoint(pub f64, pub f64);

impl RawPricePoint {
    pub fn timestamp_millis(&self) -> i64 {
        self.0 as i64
    }

    pub fn price(&self) -> f64 {
        self.1
    }
}

/// A chart-ready sample: calendar day, its display label, and the price
/// rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    /// Day-granularity label (e.g. "11/14/2023").
    pub label: String,
    pub price: f64,
}

/// Time-ordered samples for one asset over the backend's lookback
/// window (365 days).
pub type HistoricalSeries = Vec<HistoricalPoint>;
