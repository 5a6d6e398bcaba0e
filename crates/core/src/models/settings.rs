use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::asset::TrackedSet;
use crate::errors::CoreError;

/// Base URL of the local dashboard backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Which refresh cycles the recurring timer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RefreshMode {
    /// Price table only, on the short period.
    #[default]
    PricesOnly,
    /// Price table and historical charts, both on the longer period.
    WithHistory,
}

impl std::fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshMode::PricesOnly => write!(f, "PricesOnly"),
            RefreshMode::WithHistory => write!(f, "WithHistory"),
        }
    }
}

/// Dashboard configuration. Nothing is read from the environment; the
/// defaults are the production values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Backend base URL, without a trailing slash.
    pub base_url: String,

    /// Upper bound for a single backend request.
    pub request_timeout: Duration,

    pub mode: RefreshMode,

    /// Recurring period in `PricesOnly` mode.
    pub price_interval: Duration,

    /// Recurring period in `WithHistory` mode.
    pub extended_interval: Duration,

    /// Assets tracked when the dashboard starts.
    pub default_assets: TrackedSet,
}

impl DashboardSettings {
    /// Timer period for the configured mode.
    pub fn poll_interval(&self) -> Duration {
        match self.mode {
            RefreshMode::PricesOnly => self.price_interval,
            RefreshMode::WithHistory => self.extended_interval,
        }
    }

    /// Reject values the timer or HTTP client cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, value) in [
            ("request_timeout", self.request_timeout),
            ("price_interval", self.price_interval),
            ("extended_interval", self.extended_interval),
        ] {
            if value.is_zero() {
                return Err(CoreError::ValidationError(format!(
                    "{name} must be greater than zero"
                )));
            }
        }
        Ok(())
    }

    pub fn with_history(mut self) -> Self {
        self.mode = RefreshMode::WithHistory;
        self
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(90),
            mode: RefreshMode::PricesOnly,
            price_interval: Duration::from_secs(60),
            extended_interval: Duration::from_secs(300),
            default_assets: TrackedSet::default(),
        }
    }
}
