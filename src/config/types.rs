use serde::Deserialize;

/// Browser-like user agent; the Blue Dart page rejects obvious bot agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

pub const DEFAULT_BLUEDART_URL: &str = "https://www.bluedart.com/trackdartresultthirdparty";
pub const DEFAULT_DTDC_URL: &str = "https://www.dtdc.com/wp-json/custom/v1/domestic/track";
pub const DEFAULT_DELHIVERY_URL: &str = "https://dlv-api.delhivery.com/v3/unified-tracking";

pub const DEFAULT_STORE_PATH: &str = "tracking_list_v2.json";
pub const DEFAULT_LEGACY_STORE_PATH: &str = "tracking_list.json";

/// Main configuration structure for the tracker
///
/// Every section is optional in the TOML file; missing sections and keys
/// take the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub couriers: CourierEndpoints,
    pub store: StoreConfig,
}

/// HTTP client configuration shared by every courier adapter
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User agent sent with every courier request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Courier tracking endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CourierEndpoints {
    /// Blue Dart third-party tracking page (GET, `trackNo` query parameter)
    #[serde(rename = "bluedart-url")]
    pub bluedart_url: String,

    /// DTDC domestic tracking API (POST, JSON payload)
    #[serde(rename = "dtdc-url")]
    pub dtdc_url: String,

    /// Delhivery unified tracking API (GET, `wbn` query parameter)
    #[serde(rename = "delhivery-url")]
    pub delhivery_url: String,
}

impl Default for CourierEndpoints {
    fn default() -> Self {
        Self {
            bluedart_url: DEFAULT_BLUEDART_URL.to_string(),
            dtdc_url: DEFAULT_DTDC_URL.to_string(),
            delhivery_url: DEFAULT_DELHIVERY_URL.to_string(),
        }
    }
}

/// Local tracking list configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the JSON tracking list
    pub path: String,

    /// Path to the pre-v2 tracking list, migrated on first load
    #[serde(rename = "legacy-path")]
    pub legacy_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_STORE_PATH.to_string(),
            legacy_path: DEFAULT_LEGACY_STORE_PATH.to_string(),
        }
    }
}
