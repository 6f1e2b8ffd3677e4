//! DTDC adapter
//!
//! DTDC exposes a JSON endpoint that takes a POSTed consignment number and
//! returns a `header` object plus a `statuses` array, newest entry first.

use crate::courier::client::read_body;
use crate::record::normalize::{
    collapse_whitespace, field_text_or, first_string, first_string_or, split_timestamp, strip_tags,
};
use crate::record::{Scan, TrackingRecord, NOT_AVAILABLE, UNKNOWN_STATUS};
use crate::TrackError;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

pub const NAME: &str = "DTDC";

/// Location fields in order of preference
const LOCATION_FIELDS: [&str; 2] = ["actCityName", "actBranchName"];

/// Header fields copied into the delivery details
const HEADER_DETAILS: [(&str, &str); 4] = [
    ("Origin", "originCity"),
    ("Destination", "destinationCity"),
    ("Pieces", "noOfPieces"),
    ("Service", "serviceName"),
];

/// Request body for the tracking endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackRequest<'a> {
    track_type: &'a str,
    track_number: &'a str,
}

/// Looks up a DTDC consignment
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
    tracing::debug!("POST {} ({})", endpoint, tracking_number);

    let request = client.post(endpoint).json(&TrackRequest {
        track_type: "cnno",
        track_number: tracking_number,
    });
    read_body(endpoint, request).await
}

/// Parses a DTDC tracking response
///
/// Only a body that is not JSON at all produces an error record; every
/// missing or mistyped field degrades to an empty or `"N/A"` value.
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

    if let Some(statuses) = value.get("statuses").and_then(Value::as_array) {
        record.scans = statuses
            .iter()
            .filter(|event| event.is_object())
            .map(scan_from_event)
            .collect();
    }

    // Newest event first
    let mut status = record
        .scans
        .first()
        .map(|scan| scan.details.clone())
        .filter(|details| !details.is_empty());

    if let Some(header) = value.get("header").filter(|h| h.is_object()) {
        if let Some(current) = first_string(header, &["currentStatusDescription"]) {
            status = Some(collapse_whitespace(&current));
        }

        for (label, field) in HEADER_DETAILS {
            record
                .delivery_details
                .insert(label.to_string(), field_text_or(header, field, NOT_AVAILABLE));
        }
    }

    record.status = status.unwrap_or_else(|| UNKNOWN_STATUS.to_string());
    record
}

fn scan_from_event(event: &Value) -> Scan {
    let details = event
        .get("statusDescription")
        .and_then(Value::as_str)
        .map(strip_tags)
        .unwrap_or_default();

    let timestamp = event
        .get("statusTimestamp")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let (date, time) = split_timestamp(timestamp);

    Scan {
        location: first_string_or(event, &LOCATION_FIELDS, NOT_AVAILABLE),
        details,
        date,
        time,
    }
}
