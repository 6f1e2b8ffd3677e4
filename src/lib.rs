//! Parcel Tracker: multi-courier shipment tracking
//!
//! This crate queries courier tracking surfaces (Blue Dart, DTDC, Delhivery),
//! normalizes their responses into a single [`TrackingRecord`] shape, and keeps
//! a small local watch-list of tracking numbers.

pub mod config;
pub mod courier;
pub mod record;
pub mod refresh;
pub mod store;

use thiserror::Error;

/// Main error type for tracking operations
///
/// Adapters never surface this to their callers directly: every failure is
/// folded into [`TrackingRecord::error`] at the adapter boundary.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Unknown courier")]
    UnknownCourier(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for tracking operations
pub type Result<T> = std::result::Result<T, TrackError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use courier::{Courier, Tracker};
pub use record::{Scan, TrackingRecord};
pub use store::{StoreEntry, TrackingStore};
