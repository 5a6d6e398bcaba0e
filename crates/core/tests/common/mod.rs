// ═══════════════════════════════════════════════════════════════════
// Shared test helpers: mock backends, fixtures, tracing
// ═══════════════════════════════════════════════════════════════════

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use price_dashboard_core::errors::CoreError;
use price_dashboard_core::models::asset::{AssetId, TrackedSet};
use price_dashboard_core::models::price::{PriceSnapshot, RawPricePoint};
use price_dashboard_core::models::state::{DashboardState, SharedState};
use price_dashboard_core::providers::traits::PriceApi;

/// Route library logs to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn id(raw: &str) -> AssetId {
    AssetId::parse(raw).unwrap()
}

pub fn tracked(raw: &[&str]) -> TrackedSet {
    TrackedSet::from_strs(raw).unwrap()
}

pub fn shared(raw: &[&str]) -> SharedState {
    DashboardState::new(tracked(raw)).into_shared()
}

pub fn snapshot(raw_id: &str, price: f64) -> PriceSnapshot {
    let (name, symbol) = match raw_id {
        "bitcoin" => ("Bitcoin", "btc"),
        "ethereum" => ("Ethereum", "eth"),
        "solana" => ("Solana", "sol"),
        other => (other, other),
    };
    PriceSnapshot {
        id: id(raw_id),
        name: name.to_string(),
        symbol: symbol.to_string(),
        image: format!("https://assets.example/{raw_id}.png"),
        current_price: price,
        price_change_percentage_24h: Some(2.5),
        market_cap: Some(price * 1_000_000.0),
        ath: Some(price * 1.5),
    }
}

pub fn raw_series(points: &[(i64, f64)]) -> Vec<RawPricePoint> {
    points
        .iter()
        .map(|&(ts, price)| RawPricePoint(ts as f64, price))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════
// Mock backend
// ═══════════════════════════════════════════════════════════════════

/// In-memory backend. Prices and history are answered from maps; failures
/// can be switched on per concern (and per asset for history).
pub struct MockApi {
    prices: Mutex<HashMap<AssetId, PriceSnapshot>>,
    history: Mutex<HashMap<AssetId, Vec<RawPricePoint>>>,
    price_failure: Mutex<Option<CoreError>>,
    history_failures: Mutex<HashSet<AssetId>>,
    price_calls: AtomicUsize,
    history_calls: Mutex<Vec<AssetId>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            prices: Mutex::new(HashMap::new()),
            history: Mutex::new(HashMap::new()),
            price_failure: Mutex::new(None),
            history_failures: Mutex::new(HashSet::new()),
            price_calls: AtomicUsize::new(0),
            history_calls: Mutex::new(Vec::new()),
        }
    }

    /// Backend that knows bitcoin, ethereum and solana.
    pub fn with_defaults() -> Self {
        let api = Self::new();
        api.set_price(snapshot("bitcoin", 43000.5));
        api.set_price(snapshot("ethereum", 2300.25));
        api.set_price(snapshot("solana", 98.7));
        api.set_history("bitcoin", raw_series(&[(1700000000000, 42000.456), (1700086400000, 42500.0)]));
        api.set_history("ethereum", raw_series(&[(1700000000000, 2001.005)]));
        api.set_history("solana", raw_series(&[(1700000000000, 55.555)]));
        api
    }

    pub fn set_price(&self, snapshot: PriceSnapshot) {
        self.prices.lock().unwrap().insert(snapshot.id.clone(), snapshot);
    }

    pub fn set_history(&self, raw_id: &str, points: Vec<RawPricePoint>) {
        self.history.lock().unwrap().insert(id(raw_id), points);
    }

    pub fn fail_prices(&self, error: CoreError) {
        *self.price_failure.lock().unwrap() = Some(error);
    }

    pub fn heal_prices(&self) {
        *self.price_failure.lock().unwrap() = None;
    }

    pub fn fail_history_for(&self, raw_id: &str) {
        self.history_failures.lock().unwrap().insert(id(raw_id));
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> Vec<AssetId> {
        self.history_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceApi for MockApi {
    fn name(&self) -> &str {
        "MockApi"
    }

    async fn fetch_prices(&self, ids: &[AssetId]) -> Result<Vec<PriceSnapshot>, CoreError> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.price_failure.lock().unwrap().clone() {
            return Err(e);
        }
        let prices = self.prices.lock().unwrap();
        Ok(ids.iter().filter_map(|id| prices.get(id).cloned()).collect())
    }

    async fn fetch_history(&self, id: &AssetId) -> Result<Vec<RawPricePoint>, CoreError> {
        self.history_calls.lock().unwrap().push(id.clone());
        if self.history_failures.lock().unwrap().contains(id) {
            return Err(CoreError::Api {
                provider: "MockApi".into(),
                message: format!("No history for {id}"),
            });
        }
        Ok(self.history.lock().unwrap().get(id).cloned().unwrap_or_default())
    }
}

// ═══════════════════════════════════════════════════════════════════
// Gated backend: holds each request until the test releases it
// ═══════════════════════════════════════════════════════════════════

/// Backend whose requests block until `release()` is called, so tests can
/// mutate state while a refresh is in flight. `entered` is notified as
/// soon as a request starts waiting.
pub struct GatedApi {
    pub inner: MockApi,
    pub entered: Notify,
    pub release: Notify,
}

impl GatedApi {
    pub fn new(inner: MockApi) -> Arc<Self> {
        Arc::new(Self {
            inner,
            entered: Notify::new(),
            release: Notify::new(),
        })
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl PriceApi for GatedApi {
    fn name(&self) -> &str {
        "GatedApi"
    }

    async fn fetch_prices(&self, ids: &[AssetId]) -> Result<Vec<PriceSnapshot>, CoreError> {
        // Answer computed up front: the response reflects the request.
        let answer = self.inner.fetch_prices(ids).await;
        self.entered.notify_one();
        self.release.notified().await;
        answer
    }

    async fn fetch_history(&self, id: &AssetId) -> Result<Vec<RawPricePoint>, CoreError> {
        let answer = self.inner.fetch_history(id).await;
        self.entered.notify_one();
        self.release.notified().await;
        answer
    }
}
