pub mod chart_service;
pub mod format;
pub mod poller;
pub mod refresh_service;
pub mod tracking_service;
pub mod view_service;
