use tracing::{debug, info};

use crate::errors::CoreError;
use crate::models::asset::AssetId;
use crate::models::state::{lock_state, SharedState};

/// Add/remove operations on the tracked set.
///
/// Both report whether the set actually changed; callers use that to
/// decide whether to re-arm polling and kick off a refresh.
pub struct TrackingService;

impl TrackingService {
    pub fn new() -> Self {
        Self
    }

    /// Track a new asset. The id is trimmed and lowercased first.
    ///
    /// - Already tracked (in any letter case) → `Ok(false)`, set unchanged.
    /// - Blank input → `Err(ValidationError)`, set unchanged.
    pub fn add(&self, state: &SharedState, raw: &str) -> Result<bool, CoreError> {
        let id = AssetId::parse(raw)?;
        let added = lock_state(state).track(id.clone());
        if added {
            info!(asset = %id, "asset tracked");
        } else {
            debug!(asset = %id, "asset already tracked");
        }
        Ok(added)
    }

    /// Stop tracking an asset and evict its cached snapshot and series.
    ///
    /// Refused (returns false) when it is the last tracked asset or is not
    /// tracked at all. Input that cannot be an id is simply not tracked.
    pub fn remove(&self, state: &SharedState, raw: &str) -> bool {
        let Ok(id) = AssetId::parse(raw) else {
            return false;
        };
        let mut guard = lock_state(state);
        if !guard.tracked().can_remove() {
            debug!(asset = %id, "refusing to remove the last tracked asset");
            return false;
        }
        let removed = guard.untrack(&id);
        drop(guard);
        if removed {
            info!(asset = %id, "asset untracked, cached data evicted");
        }
        removed
    }
}

impl Default for TrackingService {
    fn default() -> Self {
        Self::new()
    }
}
