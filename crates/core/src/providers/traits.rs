use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::AssetId;
use crate::models::price::{PriceSnapshot, RawPricePoint};

/// Trait abstraction over the dashboard backend.
///
/// The refresh logic only talks to this trait, so the HTTP client can be
/// swapped for a mock in tests.
#[async_trait]
pub trait PriceApi: Send + Sync {
    /// Human-readable name of this backend (for logs/errors).
    fn name(&self) -> &str;

    /// Current market data for a batch of assets, in one request.
    async fn fetch_prices(&self, ids: &[AssetId]) -> Result<Vec<PriceSnapshot>, CoreError>;

    /// Raw `[timestamp_millis, price]` samples for one asset over the
    /// backend's lookback window.
    async fn fetch_history(&self, id: &AssetId) -> Result<Vec<RawPricePoint>, CoreError>;
}
