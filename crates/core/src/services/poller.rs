//! Recurring refresh timer.
//!
//! One background task per dashboard. Re-arming replaces it, and it is
//! aborted on shutdown and on drop, so at most one timer is alive.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::models::settings::RefreshMode;
use crate::models::state::SharedState;
use crate::services::refresh_service::RefreshService;

/// Owns the recurring refresh task.
///
/// The first tick fires immediately, so arming doubles as the initial
/// load and as the refresh after a tracked-set change. Each tick spawns
/// its refresh as a separate task. A slow request therefore never delays
/// the next tick, and cancelling the timer leaves in-flight requests
/// alone to finish and reconcile.
pub struct Poller {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl Poller {
    pub fn new() -> Self {
        Self {
            handle: None,
            generation: 0,
        }
    }

    /// Cancel the running timer (if any) and start a new one.
    ///
    /// Must be called from within a Tokio runtime, with a non-zero
    /// `period` (see `DashboardSettings::validate`).
    pub fn arm(
        &mut self,
        refresher: RefreshService,
        state: SharedState,
        mode: RefreshMode,
        period: Duration,
    ) {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                debug!(generation, %mode, "poll tick");
                let refresher = refresher.clone();
                let state = state.clone();
                tokio::spawn(async move {
                    refresher.refresh(&state, mode).await;
                });
            }
        });

        info!(generation, %mode, period_secs = period.as_secs_f64(), "poller armed");
        self.handle = Some(handle);
    }

    /// Stop the timer. Refreshes already in flight are not interrupted.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(generation = self.generation, "poller cancelled");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// How many times the timer has been armed.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for Poller {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel();
    }
}
