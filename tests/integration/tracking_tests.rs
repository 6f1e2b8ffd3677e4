//! Integration tests for the courier adapters
//!
//! These tests use wiremock to stand in for the courier endpoints and
//! exercise lookups, dispatch and list refresh end-to-end.

use parcel_tracker::config::{Config, CourierEndpoints, HttpConfig, StoreConfig};
use parcel_tracker::courier::Tracker;
use parcel_tracker::refresh::{refresh_all, RefreshOutcome};
use parcel_tracker::store::{JsonFileStorage, TrackingStore};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_AGENT: &str = "TestTracker/1.0";

/// Creates a test configuration pointing every courier at `base_url`
fn create_test_config(base_url: &str) -> Config {
    Config {
        http: HttpConfig {
            user_agent: USER_AGENT.to_string(),
            timeout_secs: 5,
        },
        couriers: CourierEndpoints {
            bluedart_url: format!("{}/bluedart", base_url),
            dtdc_url: format!("{}/dtdc", base_url),
            delhivery_url: format!("{}/delhivery", base_url),
        },
        store: StoreConfig::default(),
    }
}

fn tracker_for(base_url: &str) -> Tracker {
    Tracker::new(&create_test_config(base_url)).expect("Failed to build tracker")
}

#[tokio::test]
async fn test_bluedart_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bluedart"))
        .and(query_param("trackFor", "0"))
        .and(query_param("trackNo", "50012345"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><body>
                    <label>Status</label>
                    <p>  Delivered   Successfully </p>
                    <div id="SCAN50012345"><table>
                      <tr><th>Location</th><th>Details</th><th>Date</th><th>Time</th></tr>
                      <tr><td>DELHI</td><td>Shipment Delivered</td><td>02 Jan 2024</td><td>14:05</td></tr>
                    </table></div>
                    </body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = tracker_for(&mock_server.uri())
        .route("Blue Dart", "50012345")
        .await;

    assert!(record.error.is_none(), "unexpected error: {:?}", record.error);
    assert_eq!(record.status, "Delivered Successfully");
    assert_eq!(record.courier, "Blue Dart");
    assert_eq!(record.tracking_number, "50012345");
    assert_eq!(record.scans.len(), 1);
    assert_eq!(record.scans[0].location, "DELHI");
}

#[tokio::test]
async fn test_dtdc_lookup_posts_tracking_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dtdc"))
        .and(body_json(json!({"trackType": "cnno", "trackNumber": "D7001"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "header": {"originCity": "PUNE", "destinationCity": "MUMBAI"},
            "statuses": [
                {
                    "statusDescription": "<b>In Transit</b>",
                    "actCityName": "Mumbai",
                    "statusTimestamp": "2024-01-02T10:30:00"
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = tracker_for(&mock_server.uri()).route("DTDC", "D7001").await;

    assert!(record.error.is_none(), "unexpected error: {:?}", record.error);
    assert_eq!(record.status, "In Transit");
    assert_eq!(record.scans[0].details, "In Transit");
    assert_eq!(record.scans[0].location, "Mumbai");
    assert_eq!(record.scans[0].date, "2024-01-02");
    assert_eq!(record.scans[0].time, "10:30:00");
    assert_eq!(record.delivery_details["Destination"], "MUMBAI");
}

#[tokio::test]
async fn test_delhivery_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delhivery"))
        .and(query_param("wbn", "W42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "consignee": "Asha",
                "status": {"status": "Out for delivery"},
                "trackingStates": [{"scans": [
                    {"scannedLocation": "Pune_Hub", "scanNslRemark": "Dispatched", "scanDateTime": "2024-01-02T14:05:00"}
                ]}]
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = tracker_for(&mock_server.uri()).route("Delhivery", "W42").await;

    assert!(record.error.is_none(), "unexpected error: {:?}", record.error);
    assert_eq!(record.status, "Out for delivery");
    assert_eq!(record.scans[0].date, "2024-01-02");
    assert_eq!(record.scans[0].time, "14:05");
    assert_eq!(record.recipient(), "Asha");
}

#[tokio::test]
async fn test_malformed_json_yields_error_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dtdc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let record = tracker_for(&mock_server.uri()).route("DTDC", "D1").await;

    assert!(record.error.is_some());
    assert!(record.status.is_empty());
    assert!(record.scans.is_empty());
}

#[tokio::test]
async fn test_http_error_status_yields_error_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delhivery"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let record = tracker_for(&mock_server.uri()).route("Delhivery", "W1").await;

    let error = record.error.expect("expected an error");
    assert!(error.contains("503"), "error was: {}", error);
    assert!(record.status.is_empty());
}

#[tokio::test]
async fn test_transport_failure_for_every_courier() {
    // Nothing listens on port 1
    let tracker = tracker_for("http://127.0.0.1:1");

    for courier in ["Blue Dart", "DTDC", "Delhivery"] {
        let record = tracker.route(courier, "AWB1").await;

        let error = record.error.clone().unwrap_or_default();
        assert!(!error.is_empty(), "{} should report an error", courier);
        assert!(record.status.is_empty(), "{} status should be empty", courier);
        assert!(record.scans.is_empty(), "{} scans should be empty", courier);
        assert_eq!(record.courier, courier);
        assert_eq!(record.tracking_number, "AWB1");
    }
}

#[tokio::test]
async fn test_unknown_courier_is_not_requested() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let record = tracker_for(&mock_server.uri()).route("FedEx", "ANY").await;

    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({"error": "Unknown courier", "courier": "FedEx", "tracking_number": "ANY"})
    );
}

#[tokio::test]
async fn test_refresh_updates_pending_and_skips_delivered() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delhivery"))
        .and(query_param("wbn", "W1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"consignee": "Ravi", "status": {"status": "Delivered"}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/delhivery"))
        .and(query_param("wbn", "W2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"status": {"status": "In Transit"}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let list_path = dir.path().join("tracking_list_v2.json");
    std::fs::write(
        &list_path,
        r#"{
            "W0": {"courier": "Delhivery", "status": "Delivered"},
            "W1": {"courier": "Delhivery", "status": "Pending"},
            "W2": {"courier": "Delhivery", "status": "Pending"},
            "X9": {"courier": "FedEx", "status": "Pending"}
        }"#,
    )
    .unwrap();

    let mut store = TrackingStore::load(JsonFileStorage::new(&list_path));
    let tracker = tracker_for(&mock_server.uri());

    let outcomes = refresh_all(&mut store, &tracker, false).await.unwrap();

    assert_eq!(outcomes["W0"], RefreshOutcome::Skipped);
    assert!(matches!(&outcomes["X9"], RefreshOutcome::Looked(r) if r.is_error()));

    let reopened = TrackingStore::load(JsonFileStorage::new(&list_path));
    let w1 = reopened.get("W1").unwrap();
    assert_eq!(w1.status, "Delivered");
    assert!(w1.last_checked.is_some());
    assert_eq!(w1.summary.as_ref().unwrap().recipient, "Ravi");

    let w2 = reopened.get("W2").unwrap();
    assert_eq!(w2.status, "Pending");
    assert_eq!(w2.summary.as_ref().unwrap().status, "In Transit");

    let x9 = reopened.get("X9").unwrap();
    assert_eq!(x9.status, "Pending");
    assert!(x9.last_checked.is_none());
}

#[tokio::test]
async fn test_forced_refresh_includes_delivered() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dtdc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "header": {"currentStatusDescription": "Delivered"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(dir.path().join("list.json"));
    let mut store = TrackingStore::load(storage);
    store.add("D1", "DTDC").unwrap();

    let tracker = tracker_for(&mock_server.uri());

    // First pass marks it delivered, second pass skips it unless forced
    refresh_all(&mut store, &tracker, false).await.unwrap();
    assert!(store.get("D1").unwrap().is_delivered());

    mock_server.reset().await;
    Mock::given(method("POST"))
        .and(path("/dtdc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "header": {"currentStatusDescription": "Delivered"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let skipped = refresh_all(&mut store, &tracker, false).await.unwrap();
    assert_eq!(skipped["D1"], RefreshOutcome::Skipped);

    let forced = refresh_all(&mut store, &tracker, true).await.unwrap();
    assert!(matches!(&forced["D1"], RefreshOutcome::Looked(r) if r.status == "Delivered"));
}
