use crate::config::types::{Config, CourierEndpoints, HttpConfig, StoreConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound for the request timeout (seconds)
const MAX_TIMEOUT_SECS: u64 = 300;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_endpoints(&config.couriers)?;
    validate_store_config(&config.store)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECS, config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates courier endpoint URLs
fn validate_endpoints(endpoints: &CourierEndpoints) -> Result<(), ConfigError> {
    validate_endpoint("bluedart_url", &endpoints.bluedart_url)?;
    validate_endpoint("dtdc_url", &endpoints.dtdc_url)?;
    validate_endpoint("delhivery_url", &endpoints.delhivery_url)?;
    Ok(())
}

fn validate_endpoint(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", name, e)))?;

    // Mock servers in tests are plain http
    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use an http or https scheme",
            name, value
        )));
    }

    Ok(())
}

/// Validates store configuration
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation("store path cannot be empty".to_string()));
    }

    if config.path == config.legacy_path {
        return Err(ConfigError::Validation(format!(
            "store path and legacy path must differ, both are '{}'",
            config.path
        )));
    }

    Ok(())
}
