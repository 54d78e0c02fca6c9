//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the services and the
//! transport adapter. Nothing in the pipeline reads environment variables while handling a
//! request; the binaries read them and hand the raw values to the parse helpers below.

use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::{MonitorError, MonitorResult};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    api_base_url: String,
    request_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `api_base_url` must already be normalised (see [`api_base_url_from_env_value`]).
    pub fn new(api_base_url: String, request_timeout: Duration) -> MonitorResult<Self> {
        if api_base_url.trim().is_empty() {
            return Err(MonitorError::InvalidConfig(
                "api_base_url cannot be empty".into(),
            ));
        }
        if request_timeout.is_zero() {
            return Err(MonitorError::InvalidConfig(
                "request_timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            api_base_url,
            request_timeout,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the backend base URL from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default local backend URL. A trailing
/// `/` is stripped so route paths can be appended directly.
pub fn api_base_url_from_env_value(value: Option<String>) -> MonitorResult<String> {
    let Some(url) = non_blank(value) else {
        return Ok(DEFAULT_API_BASE_URL.to_string());
    };

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(MonitorError::InvalidConfig(format!(
            "api base url must start with http:// or https://, got {url}"
        )));
    }

    Ok(url.trim_end_matches('/').to_string())
}

/// Parse the request timeout (whole seconds) from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
pub fn request_timeout_from_env_value(value: Option<String>) -> MonitorResult<Duration> {
    let Some(raw) = non_blank(value) else {
        return Ok(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    };

    let secs: u64 = raw.parse().map_err(|_| {
        MonitorError::InvalidConfig(format!("request timeout must be whole seconds, got {raw}"))
    })?;
    if secs == 0 {
        return Err(MonitorError::InvalidConfig(
            "request timeout must be greater than zero".into(),
        ));
    }

    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_defaults_when_unset_or_blank() {
        assert_eq!(
            api_base_url_from_env_value(None).unwrap(),
            DEFAULT_API_BASE_URL
        );
        assert_eq!(
            api_base_url_from_env_value(Some("   ".into())).unwrap(),
            DEFAULT_API_BASE_URL
        );
    }

    #[test]
    fn test_base_url_strips_trailing_slash_and_requires_scheme() {
        assert_eq!(
            api_base_url_from_env_value(Some("https://ward.example/api/v1/".into())).unwrap(),
            "https://ward.example/api/v1"
        );
        assert!(matches!(
            api_base_url_from_env_value(Some("ward.example".into())),
            Err(MonitorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_request_timeout_parsing() {
        assert_eq!(
            request_timeout_from_env_value(None).unwrap(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
        assert_eq!(
            request_timeout_from_env_value(Some(" 30 ".into())).unwrap(),
            Duration::from_secs(30)
        );
        assert!(request_timeout_from_env_value(Some("0".into())).is_err());
        assert!(request_timeout_from_env_value(Some("soon".into())).is_err());
    }

    #[test]
    fn test_core_config_rejects_zero_timeout() {
        let err = CoreConfig::new(DEFAULT_API_BASE_URL.into(), Duration::ZERO).unwrap_err();
        assert!(matches!(err, MonitorError::InvalidConfig(_)));
    }
}
