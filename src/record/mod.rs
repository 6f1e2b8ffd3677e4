//! Normalized tracking result shared by every courier adapter
//!
//! Each adapter fills a [`TrackingRecord`] from whatever its courier returns.
//! Missing source fields leave the corresponding record fields empty (or set
//! to `"N/A"`), so a record without an error is not guaranteed to be complete.

pub mod normalize;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status reported when a courier response carries no usable status
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Placeholder for missing location/detail fields
pub const NOT_AVAILABLE: &str = "N/A";

/// Delivery-details key holding the consignee name
pub const RECIPIENT_KEY: &str = "Recipient";

/// One recorded event in a shipment's journey
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub time: String,
}

/// Result of a single tracking lookup
///
/// When `error` is set the remaining fields other than `courier` and
/// `tracking_number` are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub delivery_details: BTreeMap<String, String>,

    /// Scan history in courier order (never resorted)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scans: Vec<Scan>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub courier: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tracking_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TrackingRecord {
    /// Creates an empty record for the given courier and tracking number
    pub fn new(courier: impl Into<String>, tracking_number: impl Into<String>) -> Self {
        Self {
            courier: courier.into(),
            tracking_number: tracking_number.into(),
            ..Self::default()
        }
    }

    /// Creates a failed record carrying only identity and the error message
    pub fn failed(
        courier: impl Into<String>,
        tracking_number: impl Into<String>,
        error: impl ToString,
    ) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(courier, tracking_number)
        }
    }

    /// Returns true if the lookup failed
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns true if the courier reports the shipment as delivered
    pub fn is_delivered(&self) -> bool {
        !self.is_error() && self.status.contains("Delivered")
    }

    /// Recipient from the delivery details, or `"N/A"`
    pub fn recipient(&self) -> &str {
        self.delivery_details
            .get(RECIPIENT_KEY)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(NOT_AVAILABLE)
    }
}
