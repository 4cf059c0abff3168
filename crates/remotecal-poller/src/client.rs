//! HTTP client for calendar fetches.
//!
//! This module wraps [`reqwest`] for the one request the adapter makes: a
//! GET of the configured URL, following redirects, bounded by the
//! configured timeout. Transport failures are classified here into the
//! typed [`UpdateError`] kinds; the configured timeout is threaded into
//! timeout failures so the user-facing message can report it without
//! inspecting transport internals.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, trace};

use crate::config::SourceConfig;
use crate::error::{UpdateError, UpdateResult};

/// User agent sent with every fetch.
const USER_AGENT: &str = concat!("remotecal/", env!("CARGO_PKG_VERSION"));

/// HTTP client for fetching remote calendar documents.
#[derive(Debug, Clone)]
pub struct CalendarClient {
    client: Client,
}

impl CalendarClient {
    /// Creates a new calendar client.
    ///
    /// Redirects are followed with reqwest's default policy. The request
    /// timeout is applied per request from the source configuration, not
    /// on the client.
    pub fn new() -> UpdateResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                UpdateError::unreachable(format!("failed to create HTTP client: {e}"))
                    .with_source(e)
            })?;
        Ok(Self { client })
    }

    /// Fetches the configured URL and returns the response body text.
    ///
    /// # Errors
    ///
    /// - `Timeout` if the request exceeds the configured timeout
    /// - `Unreachable` for any other transport failure or error status
    pub async fn fetch(&self, config: &SourceConfig) -> UpdateResult<String> {
        debug!(url = %config.url, timeout_secs = config.timeout_secs(), "Fetching calendar");

        let response = self
            .client
            .get(config.url.clone())
            .timeout(config.timeout)
            .send()
            .await
            .map_err(|e| classify(e, config.timeout))?;

        let response = response
            .error_for_status()
            .map_err(|e| UpdateError::unreachable(e.to_string()).with_source(e))?;

        let body = response
            .text()
            .await
            .map_err(|e| classify(e, config.timeout))?;

        trace!(bytes = body.len(), "Fetched calendar document");
        Ok(body)
    }
}

/// Classifies a transport error into a typed failure.
fn classify(err: reqwest::Error, timeout: Duration) -> UpdateError {
    if err.is_timeout() {
        UpdateError::timeout(err.to_string(), Some(timeout)).with_source(err)
    } else {
        UpdateError::unreachable(err.to_string()).with_source(err)
    }
}
