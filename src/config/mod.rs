//! Configuration module for the tracker
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file.
//!
//! # Example
//!
//! ```no_run
//! use parcel_tracker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("parcel-tracker.toml")).unwrap();
//! println!("Requests time out after {}s", config.http.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CourierEndpoints, HttpConfig, StoreConfig, DEFAULT_BLUEDART_URL,
    DEFAULT_DELHIVERY_URL, DEFAULT_DTDC_URL, DEFAULT_LEGACY_STORE_PATH, DEFAULT_STORE_PATH,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config, DEFAULT_CONFIG_FILE};
pub use validation::validate;
