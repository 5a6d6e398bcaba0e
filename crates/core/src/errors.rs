use thiserror::Error;

/// Unified error type for the entire price-dashboard-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// The `Display` output of a variant is exactly what ends up in the
/// dashboard's error banner.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    #[error("{message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl CoreError {
    /// True for failures that happened before any HTTP response arrived.
    pub fn is_transport(&self) -> bool {
        matches!(self, CoreError::Network(_) | CoreError::Timeout)
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return CoreError::Timeout;
        }
        CoreError::Network(sanitize_url_message(&e.to_string()))
    }
}

/// Strip query parameters from a message that may embed a request URL.
/// The asset list is noise in a user-facing banner.
pub fn sanitize_url_message(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => {
            // Keep whatever follows the URL (e.g. ": connection refused")
            let tail = msg[idx..]
                .find(|c: char| c.is_whitespace() || c == ')')
                .map(|end| &msg[idx + end..])
                .unwrap_or("");
            format!("{}?<query redacted>{tail}", &msg[..idx])
        }
        None => msg.to_string(),
    }
}
