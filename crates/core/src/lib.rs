pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use models::{
    asset::{AssetId, TrackedSet},
    price::{HistoricalSeries, PriceSnapshot},
    settings::DashboardSettings,
    state::{lock_state, DashboardState, RefreshKind, RefreshState, SharedState},
    view::DashboardView,
};
use providers::{dashboard_api::DashboardApiClient, traits::PriceApi};
use services::{
    poller::Poller,
    refresh_service::{RefreshReport, RefreshService},
    tracking_service::TrackingService,
    view_service::ViewService,
};
use std::sync::Arc;
use tracing::info;

use errors::CoreError;

/// Main entry point for the price dashboard core.
/// Holds the dashboard state, the refresh timer and the services that
/// operate on them.
///
/// Lifecycle: build with [`PriceDashboard::new`] (real backend) or
/// [`PriceDashboard::with_api`], call [`start`](Self::start) inside a
/// Tokio runtime to begin polling, render [`view`](Self::view) whenever
/// you like, and [`shutdown`](Self::shutdown) (or drop) to stop the timer.
#[must_use]
pub struct PriceDashboard {
    settings: DashboardSettings,
    state: SharedState,
    tracking_service: TrackingService,
    refresh_service: RefreshService,
    view_service: ViewService,
    poller: Poller,
    started: bool,
}

impl std::fmt::Debug for PriceDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock_state(&self.state);
        f.debug_struct("PriceDashboard")
            .field("api", &self.refresh_service.api_name())
            .field("mode", &self.settings.mode)
            .field("tracked", &state.tracked().joined())
            .field("snapshots", &state.snapshot_count())
            .field("series", &state.series_count())
            .field("error", &state.error())
            .field("started", &self.started)
            .finish()
    }
}

impl PriceDashboard {
    /// Dashboard backed by the HTTP backend at `settings.base_url`.
    pub fn new(settings: DashboardSettings) -> Result<Self, CoreError> {
        settings.validate()?;
        let api = DashboardApiClient::new(&settings)?;
        Self::with_api(settings, Arc::new(api))
    }

    /// Dashboard backed by any `PriceApi` implementation.
    ///
    /// Fails with `ValidationError` when a period or the timeout is zero.
    pub fn with_api(
        settings: DashboardSettings,
        api: Arc<dyn PriceApi>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        let state = DashboardState::new(settings.default_assets.clone()).into_shared();
        Ok(Self {
            settings,
            state,
            tracking_service: TrackingService::new(),
            refresh_service: RefreshService::new(api),
            view_service: ViewService::new(),
            poller: Poller::new(),
            started: false,
        })
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Start polling. The first tick is the initial load.
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self) {
        self.started = true;
        self.rearm();
    }

    /// Stop polling. Refreshes already in flight still complete.
    pub fn shutdown(&mut self) {
        if self.started {
            info!("dashboard shutting down");
        }
        self.started = false;
        self.poller.cancel();
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.started && self.poller.is_armed()
    }

    /// How many times the refresh timer has been (re-)armed.
    #[must_use]
    pub fn poll_generation(&self) -> u64 {
        self.poller.generation()
    }

    // ── Tracked Assets ──────────────────────────────────────────────

    /// Track another asset (case-insensitive, appended at the end).
    ///
    /// Returns `Ok(false)` if it was already tracked. When the set changes
    /// and polling is running, the timer is re-armed, which refreshes
    /// immediately.
    pub fn add_asset(&mut self, id: &str) -> Result<bool, CoreError> {
        let added = self.tracking_service.add(&self.state, id)?;
        if added {
            self.on_tracked_set_changed();
        }
        Ok(added)
    }

    /// Stop tracking an asset and drop its cached data right away.
    ///
    /// Returns false for the last remaining asset or an untracked id.
    pub fn remove_asset(&mut self, id: &str) -> bool {
        let removed = self.tracking_service.remove(&self.state, id);
        if removed {
            self.on_tracked_set_changed();
        }
        removed
    }

    #[must_use]
    pub fn tracked(&self) -> TrackedSet {
        lock_state(&self.state).tracked().clone()
    }

    // ── Refresh ─────────────────────────────────────────────────────

    /// Manual refresh for the configured mode. May overlap with a timer
    /// refresh; the later response wins.
    pub async fn refresh_now(&self) -> RefreshReport {
        self.refresh_service
            .refresh(&self.state, self.settings.mode)
            .await
    }

    /// Refresh only the price table.
    pub async fn refresh_prices(&self) -> Result<usize, CoreError> {
        self.refresh_service.refresh_prices(&self.state).await
    }

    /// Refresh only the historical series.
    pub async fn refresh_history(&self) -> Result<usize, CoreError> {
        self.refresh_service.refresh_history(&self.state).await
    }

    // ── View & Inspection ───────────────────────────────────────────

    /// Project the current state into a render-ready view.
    #[must_use]
    pub fn view(&self) -> DashboardView {
        self.view_service.project(&lock_state(&self.state))
    }

    /// The currently surfaced error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        lock_state(&self.state).error().map(str::to_string)
    }

    #[must_use]
    pub fn snapshot(&self, id: &AssetId) -> Option<PriceSnapshot> {
        lock_state(&self.state).snapshot(id).cloned()
    }

    #[must_use]
    pub fn series(&self, id: &AssetId) -> Option<HistoricalSeries> {
        lock_state(&self.state).series(id).cloned()
    }

    #[must_use]
    pub fn refresh_state(&self, kind: RefreshKind) -> RefreshState {
        lock_state(&self.state).refresh_state(kind)
    }

    /// True until the first price refresh has finished.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        lock_state(&self.state).is_initial_load()
    }

    #[must_use]
    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// Shared state handle, for renderers that observe it directly.
    #[must_use]
    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn on_tracked_set_changed(&mut self) {
        if self.started {
            self.rearm();
        }
    }

    fn rearm(&mut self) {
        self.poller.arm(
            self.refresh_service.clone(),
            Arc::clone(&self.state),
            self.settings.mode,
            self.settings.poll_interval(),
        );
    }
}
