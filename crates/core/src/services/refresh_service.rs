use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::errors::CoreError;
use crate::models::asset::{join_ids, AssetId};
use crate::models::settings::RefreshMode;
use crate::models::state::{lock_state, RefreshGuard, RefreshKind, SharedState};
use crate::providers::traits::PriceApi;
use crate::services::chart_service::ChartService;

/// Runs refresh cycles against the backend and reconciles the results
/// into the shared dashboard state.
///
/// Refreshes may overlap freely: nothing is deduplicated or cancelled, and
/// whichever response lands last overwrites what it touches. Each cycle
/// reads the tracked set when it starts and re-checks membership when it
/// applies results, so data for an asset removed mid-flight is discarded.
///
/// Failures never clear previously fetched data. They only replace the
/// single error message. Nothing is retried automatically.
#[derive(Clone)]
pub struct RefreshService {
    api: Arc<dyn PriceApi>,
}

impl RefreshService {
    pub fn new(api: Arc<dyn PriceApi>) -> Self {
        Self { api }
    }

    pub fn api_name(&self) -> &str {
        self.api.name()
    }

    /// Fetch current prices for the whole tracked set in one request.
    ///
    /// On success every returned snapshot for a still-tracked asset is
    /// stored and the error message is cleared. On failure the message is
    /// set and existing snapshots stay as they are. Either way the
    /// loading/refreshing indicators are released when this returns.
    ///
    /// Returns the number of snapshots stored.
    pub async fn refresh_prices(&self, state: &SharedState) -> Result<usize, CoreError> {
        let _guard = RefreshGuard::begin(state, RefreshKind::Prices);
        let ids = tracked_ids(state);
        debug!(ids = %join_ids(&ids), "price refresh started");

        match self.api.fetch_prices(&ids).await {
            Ok(snapshots) => {
                let returned = snapshots.len();
                let stored = {
                    let mut s = lock_state(state);
                    let stored = s.apply_snapshots(snapshots);
                    s.clear_error();
                    stored
                };
                info!(returned, stored, "price refresh finished");
                Ok(stored)
            }
            Err(e) => {
                log_failure(RefreshKind::Prices, None, &e);
                lock_state(state).set_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetch historical series one asset at a time, in tracked order.
    ///
    /// The first failure stops the pass and sets the error message. Series
    /// fetched earlier in the pass are kept; later assets keep whatever
    /// series they had before. Assets untracked while the pass is running
    /// are skipped.
    ///
    /// Returns the number of series stored.
    pub async fn refresh_history(&self, state: &SharedState) -> Result<usize, CoreError> {
        let _guard = RefreshGuard::begin(state, RefreshKind::History);
        let ids = tracked_ids(state);
        debug!(ids = %join_ids(&ids), "history refresh started");

        let charts = ChartService::new();
        let mut stored = 0;

        for id in &ids {
            if !lock_state(state).tracked().contains(id) {
                debug!(asset = %id, "skipping history for untracked asset");
                continue;
            }

            let raw = match self.api.fetch_history(id).await {
                Ok(raw) => raw,
                Err(e) => {
                    log_failure(RefreshKind::History, Some(id), &e);
                    lock_state(state).set_error(e.to_string());
                    return Err(e);
                }
            };

            let series = charts.build_series(&raw);
            let points = series.len();
            if lock_state(state).apply_series(id, series) {
                debug!(asset = %id, points, "history stored");
                stored += 1;
            }
        }

        info!(stored, "history refresh finished");
        Ok(stored)
    }

    /// One full cycle for `mode`. With history, both concerns run
    /// concurrently and each reports its own result.
    ///
    /// The banner only holds the latest message, and a price success
    /// clears it. A history failure that lands before the price batch
    /// succeeds is therefore gone from the banner by the time this
    /// returns; the report still carries it in `history`.
    pub async fn refresh(&self, state: &SharedState, mode: RefreshMode) -> RefreshReport {
        match mode {
            RefreshMode::PricesOnly => RefreshReport {
                prices: self.refresh_prices(state).await,
                history: None,
            },
            RefreshMode::WithHistory => {
                let (prices, history) =
                    tokio::join!(self.refresh_prices(state), self.refresh_history(state));
                RefreshReport {
                    prices,
                    history: Some(history),
                }
            }
        }
    }
}

/// Result of one refresh cycle.
#[derive(Debug)]
pub struct RefreshReport {
    /// Snapshots stored, or why the price batch failed.
    pub prices: Result<usize, CoreError>,
    /// Series stored, or the first failure. `None` when history was not run.
    pub history: Option<Result<usize, CoreError>>,
}

impl RefreshReport {
    pub fn is_ok(&self) -> bool {
        self.prices.is_ok() && self.history.as_ref().map_or(true, Result::is_ok)
    }

    /// The price failure if there was one, otherwise the history failure.
    pub fn first_error(&self) -> Option<&CoreError> {
        self.prices
            .as_ref()
            .err()
            .or_else(|| self.history.as_ref().and_then(|h| h.as_ref().err()))
    }
}

/// Transport failures are expected while the backend is down; anything
/// else means the backend answered with something unusable.
fn log_failure(kind: RefreshKind, asset: Option<&AssetId>, e: &CoreError) {
    let asset = asset.map(AssetId::as_str).unwrap_or("*");
    if e.is_transport() {
        warn!(%kind, asset, error = %e, "refresh failed, backend unreachable");
    } else {
        error!(%kind, asset, error = %e, "refresh failed");
    }
}

fn tracked_ids(state: &SharedState) -> Vec<AssetId> {
    lock_state(state).tracked().as_slice().to_vec()
}
