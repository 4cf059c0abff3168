//! Source and poller configuration.
//!
//! A [`SourceConfig`] is immutable for the lifetime of a pipeline: changing
//! the URL or timeout means building a new pipeline, the same way the
//! surrounding application would recreate the instance on reconfiguration.

use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;
use url::Url;

/// Default refresh interval: once per day.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The source URL could not be parsed.
    #[error("invalid calendar URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL scheme is not fetchable over HTTP(S).
    #[error("unsupported URL scheme {scheme:?} (expected http or https)")]
    UnsupportedScheme { scheme: String },
}

/// Configuration of a single remote calendar source.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// The calendar URL.
    pub url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl SourceConfig {
    /// Creates a source configuration from a URL string and a timeout in
    /// seconds.
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, ConfigError> {
        let url = Url::parse(url).map_err(|source| ConfigError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                scheme: url.scheme().to_string(),
            });
        }
        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Returns the configured timeout in whole seconds.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }
}

/// Configuration of the polling coordinator around a source.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// The calendar source.
    pub source: SourceConfig,
    /// Interval between scheduled refreshes.
    pub interval: Duration,
    /// Configured timezone, used when rendering diagnostics timestamps.
    pub timezone: Tz,
}

impl PollerConfig {
    /// Creates a poller configuration with the default interval and UTC
    /// timezone.
    pub fn new(source: SourceConfig) -> Self {
        Self {
            source,
            interval: DEFAULT_INTERVAL,
            timezone: Tz::UTC,
        }
    }

    /// Builder: set the refresh interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Builder: set the configured timezone.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_config_valid_url() {
        let config = SourceConfig::new("https://example.com/cal.ics", 10).unwrap();
        assert_eq!(config.url.as_str(), "https://example.com/cal.ics");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.timeout_secs(), 10);
    }

    #[test]
    fn source_config_invalid_url() {
        let err = SourceConfig::new("not a url", 10).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn source_config_rejects_non_http_scheme() {
        let err = SourceConfig::new("ftp://example.com/cal.ics", 10).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedScheme { ref scheme } if scheme == "ftp"
        ));
    }

    #[test]
    fn poller_config_defaults() {
        let source = SourceConfig::new("https://example.com/cal.ics", 10).unwrap();
        let config = PollerConfig::new(source);

        assert_eq!(config.interval, DEFAULT_INTERVAL);
        assert_eq!(config.timezone, Tz::UTC);
    }

    #[test]
    fn poller_config_builders() {
        let source = SourceConfig::new("https://example.com/cal.ics", 10).unwrap();
        let config = PollerConfig::new(source)
            .with_interval(Duration::from_secs(3600))
            .with_timezone(chrono_tz::Europe::Paris);

        assert_eq!(config.interval, Duration::from_secs(3600));
        assert_eq!(config.timezone, chrono_tz::Europe::Paris);
    }
}
