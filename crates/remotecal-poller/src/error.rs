//! Typed refresh failures.
//!
//! Every refresh cycle ends in either a parsed calendar or an
//! [`UpdateError`]. The error carries a machine-readable kind plus the
//! human-readable placeholder map the embedding application feeds into its
//! message translation layer. None of the kinds is retried within the
//! cycle; the next attempt is the next scheduled interval.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Sentinel used when a timeout failure carries no configured timeout.
pub const NO_TIMEOUT_SET: &str = "No timeout set";

/// The category of a refresh failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateErrorKind {
    /// The request exceeded the configured timeout.
    Timeout,
    /// Any other transport, URL, or HTTP status failure.
    Unreachable,
    /// The response body is not a valid ICS document.
    InvalidFormat,
}

impl UpdateErrorKind {
    /// Returns the machine-readable tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Unreachable => "unreachable",
            Self::InvalidFormat => "invalid_format",
        }
    }
}

impl fmt::Display for UpdateErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failure of a single refresh cycle.
#[derive(Debug, Error)]
pub struct UpdateError {
    /// The kind categorizing this failure.
    kind: UpdateErrorKind,
    /// Human-readable text of the underlying error.
    message: String,
    /// The configured request timeout, threaded through explicitly for
    /// `Timeout` failures.
    timeout: Option<Duration>,
    /// The underlying cause, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl UpdateError {
    /// Creates a timeout failure carrying the configured timeout.
    pub fn timeout(message: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            kind: UpdateErrorKind::Timeout,
            message: message.into(),
            timeout,
            source: None,
        }
    }

    /// Creates an unreachable failure.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            kind: UpdateErrorKind::Unreachable,
            message: message.into(),
            timeout: None,
            source: None,
        }
    }

    /// Creates an invalid-format failure.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self {
            kind: UpdateErrorKind::InvalidFormat,
            message: message.into(),
            timeout: None,
            source: None,
        }
    }

    /// Sets the source error for this failure.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the failure kind.
    pub fn kind(&self) -> UpdateErrorKind {
        self.kind
    }

    /// Returns the human-readable error text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the placeholder map for user-facing messages.
    ///
    /// Always contains `err`; for `Timeout` failures it also contains
    /// `timeout_s` with the configured timeout in whole seconds, or the
    /// [`NO_TIMEOUT_SET`] sentinel when none was configured.
    pub fn placeholders(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("err".to_string(), self.message.clone());
        if self.kind == UpdateErrorKind::Timeout {
            let timeout_s = self
                .timeout
                .map(|t| t.as_secs().to_string())
                .unwrap_or_else(|| NO_TIMEOUT_SET.to_string());
            map.insert("timeout_s".to_string(), timeout_s);
        }
        map
    }
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// A specialized Result type for refresh operations.
pub type UpdateResult<T> = Result<T, UpdateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags() {
        assert_eq!(UpdateErrorKind::Timeout.as_str(), "timeout");
        assert_eq!(UpdateErrorKind::Unreachable.as_str(), "unreachable");
        assert_eq!(UpdateErrorKind::InvalidFormat.as_str(), "invalid_format");
    }

    #[test]
    fn timeout_placeholders_with_configured_timeout() {
        let err = UpdateError::timeout("deadline elapsed", Some(Duration::from_secs(10)));
        let map = err.placeholders();

        assert_eq!(map.get("err").map(String::as_str), Some("deadline elapsed"));
        assert_eq!(map.get("timeout_s").map(String::as_str), Some("10"));
    }

    #[test]
    fn timeout_placeholders_fallback() {
        let err = UpdateError::timeout("deadline elapsed", None);
        let map = err.placeholders();

        assert_eq!(
            map.get("timeout_s").map(String::as_str),
            Some(NO_TIMEOUT_SET)
        );
    }

    #[test]
    fn non_timeout_placeholders_have_no_timeout_key() {
        let err = UpdateError::unreachable("connection refused");
        let map = err.placeholders();

        assert_eq!(
            map.get("err").map(String::as_str),
            Some("connection refused")
        );
        assert!(!map.contains_key("timeout_s"));
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = UpdateError::invalid_format("missing BEGIN:VCALENDAR");
        let display = format!("{err}");
        assert!(display.contains("invalid_format"));
        assert!(display.contains("missing BEGIN:VCALENDAR"));
    }

    #[test]
    fn with_source_preserves_cause() {
        use std::error::Error;
        let io_err = std::io::Error::other("boom");
        let err = UpdateError::unreachable("request failed").with_source(io_err);
        assert!(err.source().is_some());
    }
}
