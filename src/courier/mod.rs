//! Courier adapters and dispatch
//!
//! This module contains the per-courier lookup logic, including:
//! - The shared HTTP client configuration
//! - One adapter per courier (Blue Dart, DTDC, Delhivery)
//! - Exact-name dispatch from a courier name to its adapter
//!
//! Adapters are independent of each other. They share only the
//! [`TrackingRecord`] output shape and the HTTP client.

pub mod bluedart;
mod client;
pub mod delhivery;
pub mod dtdc;

pub use client::{build_http_client, endpoint_with_query, read_body};

use crate::config::{Config, CourierEndpoints};
use crate::record::TrackingRecord;
use crate::TrackError;
use reqwest::Client;
use std::fmt;

/// Courier supported by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Courier {
    BlueDart,
    Dtdc,
    Delhivery,
}

impl Courier {
    /// Name used on the command line and in the tracking list
    pub fn name(&self) -> &'static str {
        match self {
            Self::BlueDart => bluedart::NAME,
            Self::Dtdc => dtdc::NAME,
            Self::Delhivery => delhivery::NAME,
        }
    }

    /// Resolves a courier by its exact name
    ///
    /// Matching is case-sensitive with no trimming: `"dtdc"` is not `"DTDC"`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|courier| courier.name() == name)
    }

    /// Returns all supported couriers
    pub fn all() -> [Self; 3] {
        [Self::BlueDart, Self::Dtdc, Self::Delhivery]
    }

    /// Parses a raw response body with this courier's rules
    pub fn parse(&self, body: &str, tracking_number: &str) -> TrackingRecord {
        match self {
            Self::BlueDart => bluedart::parse(body, tracking_number),
            Self::Dtdc => dtdc::parse(body, tracking_number),
            Self::Delhivery => delhivery::parse(body, tracking_number),
        }
    }
}

impl fmt::Display for Courier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error record for a courier name outside the supported set
pub fn unknown_courier(courier_name: &str, tracking_number: &str) -> TrackingRecord {
    TrackingRecord::failed(
        courier_name,
        tracking_number,
        TrackError::UnknownCourier(courier_name.to_string()),
    )
}

/// Parses a saved response body for the named courier
///
/// Used to inspect captured responses offline. An unknown courier name
/// yields the same error record as [`Tracker::route`].
pub fn parse_offline(courier_name: &str, body: &str, tracking_number: &str) -> TrackingRecord {
    match Courier::from_name(courier_name) {
        Some(courier) => courier.parse(body, tracking_number),
        None => unknown_courier(courier_name, tracking_number),
    }
}

/// Dispatches tracking lookups to the courier adapters
pub struct Tracker {
    client: Client,
    endpoints: CourierEndpoints,
}

impl Tracker {
    /// Creates a tracker from the configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The tracker configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Tracker)` - HTTP client built successfully
    /// * `Err(TrackError)` - Failed to build the HTTP client
    pub fn new(config: &Config) -> crate::Result<Self> {
        let client = build_http_client(&config.http)?;
        Ok(Self::with_client(client, config.couriers.clone()))
    }

    /// Creates a tracker around an existing client
    pub fn with_client(client: Client, endpoints: CourierEndpoints) -> Self {
        Self { client, endpoints }
    }

    /// Looks up a tracking number with the given courier
    ///
    /// Issues exactly one request. Every failure is reported through the
    /// record's `error` field.
    pub async fn fetch(&self, courier: Courier, tracking_number: &str) -> TrackingRecord {
        tracing::debug!("Tracking {} via {}", tracking_number, courier);

        let record = match courier {
            Courier::BlueDart => {
                bluedart::fetch(&self.client, &self.endpoints.bluedart_url, tracking_number).await
            }
            Courier::Dtdc => {
                dtdc::fetch(&self.client, &self.endpoints.dtdc_url, tracking_number).await
            }
            Courier::Delhivery => {
                delhivery::fetch(&self.client, &self.endpoints.delhivery_url, tracking_number)
                    .await
            }
        };

        if !record.is_error() {
            tracing::debug!(
                "{} {}: status '{}', {} scans",
                courier,
                tracking_number,
                record.status,
                record.scans.len()
            );
        }

        record
    }

    /// Routes a lookup by courier name
    ///
    /// Names outside the fixed vocabulary yield an `"Unknown courier"` error
    /// record without touching the network.
    pub async fn route(&self, courier_name: &str, tracking_number: &str) -> TrackingRecord {
        match Courier::from_name(courier_name) {
            Some(courier) => self.fetch(courier, tracking_number).await,
            None => {
                tracing::warn!("Unknown courier '{}'", courier_name);
                unknown_courier(courier_name, tracking_number)
            }
        }
    }
}
