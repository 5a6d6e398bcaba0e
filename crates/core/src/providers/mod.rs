pub mod traits;

// Backend implementations
pub mod dashboard_api;
