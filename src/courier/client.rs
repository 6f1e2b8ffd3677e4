//! HTTP plumbing shared by the courier adapters
//!
//! This module handles:
//! - Building the HTTP client with the configured user agent and timeout
//! - Attaching query parameters to endpoint URLs
//! - Sending a single request and reading its body, with error classification
//!
//! There is deliberately no retry: a failed request is reported once.

use crate::config::HttpConfig;
use crate::TrackError;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with the configured user agent and timeout
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use parcel_tracker::config::HttpConfig;
/// use parcel_tracker::courier::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Appends query parameters to an endpoint URL
///
/// Parameters are percent-encoded, so tracking numbers are passed through
/// verbatim without any format validation.
pub fn endpoint_with_query(endpoint: &str, params: &[(&str, &str)]) -> Result<Url, url::ParseError> {
    Url::parse_with_params(endpoint, params)
}

/// Sends a prepared request and returns the response body
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Connection refused, DNS, TLS, timeout | `TrackError::Http` |
/// | Non-2xx status | `TrackError::Status` |
/// | Body could not be read | `TrackError::Http` |
pub async fn read_body(url: &str, request: RequestBuilder) -> Result<String, TrackError> {
    let response = request.send().await.map_err(|source| {
        if source.is_timeout() {
            tracing::debug!("Request to {} timed out", url);
        }
        TrackError::Http {
            url: url.to_string(),
            source,
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(TrackError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| TrackError::Http {
        url: url.to_string(),
        source,
    })
}
