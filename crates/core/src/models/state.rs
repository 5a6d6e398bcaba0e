use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::asset::{AssetId, TrackedSet};
use super::price::{HistoricalSeries, PriceSnapshot};

/// Whether a refresh concern currently has work in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

/// The two independent refresh concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefreshKind {
    Prices,
    History,
}

impl std::fmt::Display for RefreshKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshKind::Prices => write!(f, "prices"),
            RefreshKind::History => write!(f, "history"),
        }
    }
}

/// Everything the dashboard knows: the tracked set, fetched data and the
/// process-wide loading/error flags.
///
/// Snapshot and series maps only ever hold ids that are tracked right now.
/// Data for an id is evicted the moment the id leaves the set, and late
/// responses for untracked ids are dropped on arrival.
#[derive(Debug, Clone)]
pub struct DashboardState {
    tracked: TrackedSet,
    snapshots: HashMap<AssetId, PriceSnapshot>,
    history: HashMap<AssetId, HistoricalSeries>,
    error: Option<String>,
    /// True until the first price refresh finishes (either way).
    initial_load: bool,
    prices_in_flight: usize,
    history_in_flight: usize,
}

/// Shared handle used by the facade, the poller and in-flight refreshes.
/// The lock is never held across an `.await`.
pub type SharedState = Arc<Mutex<DashboardState>>;

impl DashboardState {
    pub fn new(tracked: TrackedSet) -> Self {
        Self {
            tracked,
            snapshots: HashMap::new(),
            history: HashMap::new(),
            error: None,
            initial_load: true,
            prices_in_flight: 0,
            history_in_flight: 0,
        }
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(Mutex::new(self))
    }

    // ── Tracked set ─────────────────────────────────────────────────

    pub fn tracked(&self) -> &TrackedSet {
        &self.tracked
    }

    /// Append `id` to the tracked set. Returns false if already tracked.
    pub fn track(&mut self, id: AssetId) -> bool {
        self.tracked.insert(id)
    }

    /// Remove `id` and evict its cached data. Refused for the last member.
    pub fn untrack(&mut self, id: &AssetId) -> bool {
        if !self.tracked.remove(id) {
            return false;
        }
        self.snapshots.remove(id);
        self.history.remove(id);
        true
    }

    // ── Fetched data ────────────────────────────────────────────────

    pub fn snapshot(&self, id: &AssetId) -> Option<&PriceSnapshot> {
        self.snapshots.get(id)
    }

    pub fn series(&self, id: &AssetId) -> Option<&HistoricalSeries> {
        self.history.get(id)
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn series_count(&self) -> usize {
        self.history.len()
    }

    /// Store every returned snapshot whose id is still tracked.
    /// Tracked ids missing from the batch keep their previous snapshot.
    /// Returns how many snapshots were stored.
    pub fn apply_snapshots(&mut self, snapshots: Vec<PriceSnapshot>) -> usize {
        let mut stored = 0;
        for snapshot in snapshots {
            if self.tracked.contains(&snapshot.id) {
                self.snapshots.insert(snapshot.id.clone(), snapshot);
                stored += 1;
            }
        }
        stored
    }

    /// Store a freshly fetched series. Returns false (and drops it) if the
    /// id was untracked while the request was in flight.
    pub fn apply_series(&mut self, id: &AssetId, series: HistoricalSeries) -> bool {
        if !self.tracked.contains(id) {
            return false;
        }
        self.history.insert(id.clone(), series);
        true
    }

    // ── Error channel ───────────────────────────────────────────────

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Overwrite the surfaced error with the most recent failure.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // ── Loading / refreshing flags ──────────────────────────────────

    pub fn is_initial_load(&self) -> bool {
        self.initial_load
    }

    pub fn refresh_state(&self, kind: RefreshKind) -> RefreshState {
        let in_flight = match kind {
            RefreshKind::Prices => self.prices_in_flight,
            RefreshKind::History => self.history_in_flight,
        };
        if in_flight > 0 {
            RefreshState::Refreshing
        } else {
            RefreshState::Idle
        }
    }

    fn begin(&mut self, kind: RefreshKind) {
        match kind {
            RefreshKind::Prices => self.prices_in_flight += 1,
            RefreshKind::History => self.history_in_flight += 1,
        }
    }

    fn finish(&mut self, kind: RefreshKind) {
        match kind {
            RefreshKind::Prices => {
                self.prices_in_flight = self.prices_in_flight.saturating_sub(1);
                self.initial_load = false;
            }
            RefreshKind::History => {
                self.history_in_flight = self.history_in_flight.saturating_sub(1);
            }
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(TrackedSet::default())
    }
}

/// Lock the shared state, recovering the data if a holder panicked.
pub fn lock_state(state: &SharedState) -> MutexGuard<'_, DashboardState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Marks one refresh of `kind` as in flight for as long as it lives.
///
/// Dropping the guard clears the indicator, so cleanup also happens when
/// a refresh fails early or its task is aborted mid-request.
#[must_use = "the refresh is marked finished as soon as the guard is dropped"]
pub struct RefreshGuard {
    state: SharedState,
    kind: RefreshKind,
}

impl RefreshGuard {
    pub fn begin(state: &SharedState, kind: RefreshKind) -> Self {
        lock_state(state).begin(kind);
        Self {
            state: Arc::clone(state),
            kind,
        }
    }
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        lock_state(&self.state).finish(self.kind);
    }
}
