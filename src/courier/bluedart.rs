//! Blue Dart adapter
//!
//! Blue Dart has no JSON API; the third-party tracking page is scraped.
//! The status sits in a `<p>` following a `<label>Status</label>`, the
//! shipment tab (`div#SHIP...`) holds a key/value table and the scan tab
//! (`div#SCAN...`) holds the history table.

use crate::courier::client::{endpoint_with_query, read_body};
use crate::record::normalize::{collapse_whitespace, strip_tags};
use crate::record::{Scan, TrackingRecord, UNKNOWN_STATUS};
use crate::TrackError;
use regex::Regex;
use reqwest::header::ACCEPT;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const NAME: &str = "Blue Dart";

/// Scan-table rows whose first cell contains one of these are headers
const SCAN_HEADER_MARKERS: [&str; 3] = ["Location", "24 Hr Format", "Feedback By"];

fn status_pattern() -> &'static Regex {
    static STATUS: OnceLock<Regex> = OnceLock::new();
    STATUS.get_or_init(|| {
        Regex::new(r"(?is)<label[^>]*>\s*Status\s*</label>.*?<p[^>]*>(.*?)</p>")
            .expect("status pattern is valid")
    })
}

/// Looks up a Blue Dart waybill
///
/// Transport failures are returned as an error record; the page itself
/// never produces one.
pub async fn fetch(client: &Client, endpoint: &str, tracking_number: &str) -> TrackingRecord {
    match request(client, endpoint, tracking_number).await {
        Ok(html) => parse(&html, tracking_number),
        Err(e) => {
            tracing::warn!("{} lookup for {} failed: {}", NAME, tracking_number, e);
            TrackingRecord::failed(NAME, tracking_number, e)
        }
    }
}

async fn request(client: &Client, endpoint: &str, tracking_number: &str) -> Result<String, TrackError> {
    let url = endpoint_with_query(endpoint, &[("trackFor", "0"), ("trackNo", tracking_number)])?;
    tracing::debug!("GET {}", url);

    let request = client.get(url.clone()).header(
        ACCEPT,
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    );
    read_body(url.as_str(), request).await
}

/// Parses a Blue Dart tracking page
///
/// # Status Resolution
///
/// 1. Text of the `<p>` after `<label>Status</label>`, whitespace collapsed
/// 2. The shipment table's "Status" row
/// 3. `"Unknown"`
pub fn parse(html: &str, tracking_number: &str) -> TrackingRecord {
    let mut record = TrackingRecord::new(NAME, tracking_number);
    let document = Html::parse_document(html);

    let shipment = extract_shipment_details(&document);
    record.delivery_details = shipment.details;
    record.scans = extract_scans(&document);

    let labelled = extract_labelled_status(html);

    record.status = match labelled.or(shipment.status) {
        Some(status) => status,
        None => {
            tracing::debug!("No status found on {} page for {}", NAME, tracking_number);
            UNKNOWN_STATUS.to_string()
        }
    };

    record
}

/// Extracts the status paragraph that follows the "Status" label
fn extract_labelled_status(html: &str) -> Option<String> {
    status_pattern()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| strip_tags(m.as_str()))
        .filter(|status| !status.is_empty())
}

/// Key/value rows of the shipment tab
#[derive(Debug, Default)]
struct ShipmentTable {
    details: BTreeMap<String, String>,
    /// First line of the first row whose key mentions "Status", in page order
    status: Option<String>,
}

/// Collects key/value rows from the shipment tab
fn extract_shipment_details(document: &Html) -> ShipmentTable {
    let mut table = ShipmentTable::default();

    let (Ok(row_selector), Ok(cell_selector)) = (
        Selector::parse("div[id^='SHIP'] tr"),
        Selector::parse("td, th"),
    ) else {
        return table;
    };

    for row in document.select(&row_selector) {
        let raw: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>())
            .collect();
        if raw.len() < 2 {
            continue;
        }

        let key = collapse_whitespace(&raw[0])
            .trim_matches(|c| c == ' ' || c == ':')
            .to_string();
        if key.is_empty() {
            continue;
        }

        if table.status.is_none() && key.contains("Status") {
            table.status = raw[1]
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(collapse_whitespace);
        }

        table.details.insert(key, collapse_whitespace(&raw[1]));
    }

    table
}

/// Collects history rows from the scan tab
fn extract_scans(document: &Html) -> Vec<Scan> {
    let Ok(row_selector) = Selector::parse("div[id^='SCAN'] tr") else {
        return Vec::new();
    };

    document
        .select(&row_selector)
        .map(row_cells)
        .filter(|cells| cells.len() >= 3 && !cells[0].is_empty())
        .filter(|cells| {
            !SCAN_HEADER_MARKERS
                .iter()
                .any(|marker| cells[0].contains(marker))
        })
        .map(|mut cells| {
            cells.resize(4, String::new());
            let mut cells = cells.into_iter();
            Scan {
                location: cells.next().unwrap_or_default(),
                details: cells.next().unwrap_or_default(),
                date: cells.next().unwrap_or_default(),
                time: cells.next().unwrap_or_default(),
            }
        })
        .collect()
}

/// Text of every `td`/`th` in a row, whitespace collapsed
fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    let Ok(cell_selector) = Selector::parse("td, th") else {
        return Vec::new();
    };

    row.select(&cell_selector)
        .map(|cell| collapse_whitespace(&cell.text().collect::<String>()))
        .collect()
}
