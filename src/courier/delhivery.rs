//! Delhivery adapter
//!
//! The unified tracking API nests scans two levels deep:
//! `data[0].trackingStates[*].scans[*]`.

use crate::courier::client::{endpoint_with_query, read_body};
use crate::record::normalize::{field_text_or, first_string, first_string_or, split_iso_datetime};
use crate::record::{Scan, TrackingRecord, NOT_AVAILABLE, RECIPIENT_KEY, UNKNOWN_STATUS};
use crate::TrackError;
use reqwest::header::{ACCEPT, ORIGIN, REFERER};
use reqwest::Client;
use serde_json::Value;

pub const NAME: &str = "Delhivery";

/// Shipment fields copied into the delivery details
const SHIPMENT_DETAILS: [(&str, &str); 4] = [
    ("Origin", "consignor"),
    ("Destination", "destination"),
    ("Expected Delivery", "deliveryDate"),
    (RECIPIENT_KEY, "consignee"),
];

/// Looks up a Delhivery waybill
pub async fn fetch(client: &Client, endpoint: &str, tracking_number: &str) -> TrackingRecord {
    match request(client, endpoint, tracking_number).await {
        Ok(body) => parse(&body, tracking_number),
        Err(e) => {
            tracing::warn!("{} lookup for {} failed: {}", NAME, tracking_number, e);
            TrackingRecord::failed(NAME, tracking_number, e)
        }
    }
}

async fn request(client: &Client, endpoint: &str, tracking_number: &str) -> Result<String, TrackError> {
    let url = endpoint_with_query(endpoint, &[("wbn", tracking_number)])?;
    tracing::debug!("GET {}", url);

    // The API only answers requests that look like they come from the site
    let request = client
        .get(url.clone())
        .header(ACCEPT, "application/json, text/plain, */*")
        .header(REFERER, "https://www.delhivery.com/")
        .header(ORIGIN, "https://www.delhivery.com");
    read_body(url.as_str(), request).await
}

/// Parses a Delhivery tracking response
pub fn parse(body: &str, tracking_number: &str) -> TrackingRecord {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => normalize(&value, tracking_number),
        Err(e) => {
            tracing::warn!("{} returned malformed JSON for {}: {}", NAME, tracking_number, e);
            TrackingRecord::failed(NAME, tracking_number, TrackError::Json(e))
        }
    }
}

fn normalize(value: &Value, tracking_number: &str) -> TrackingRecord {
    let mut record = TrackingRecord::new(NAME, tracking_number);

    let shipment = value
        .get("data")
        .and_then(Value::as_array)
        .and_then(|data| data.first())
        .filter(|shipment| shipment.is_object());

    let Some(shipment) = shipment else {
        tracing::debug!("{} response for {} has no shipment data", NAME, tracking_number);
        record.status = UNKNOWN_STATUS.to_string();
        return record;
    };

    record.scans = shipment
        .get("trackingStates")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|state| state.get("scans").and_then(Value::as_array))
        .flatten()
        .filter(|scan| scan.is_object())
        .map(scan_from_entry)
        .collect();

    record.status = shipment
        .get("status")
        .and_then(|status| first_string(status, &["status", "statusType"]))
        .unwrap_or_else(|| UNKNOWN_STATUS.to_string());

    for (label, field) in SHIPMENT_DETAILS {
        record
            .delivery_details
            .insert(label.to_string(), field_text_or(shipment, field, NOT_AVAILABLE));
    }

    record
}

fn scan_from_entry(entry: &Value) -> Scan {
    let timestamp = entry
        .get("scanDateTime")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let (date, time) = split_iso_datetime(timestamp);

    Scan {
        location: first_string_or(entry, &["scannedLocation", "cityLocation"], NOT_AVAILABLE),
        details: first_string_or(entry, &["scanNslRemark", "scan"], "Scan"),
        date,
        time,
    }
}
