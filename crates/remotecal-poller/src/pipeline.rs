//! The refresh pipeline.
//!
//! One refresh cycle is: fetch the configured URL, classify transport
//! failures, parse the body as ICS, classify parse failures, and retain the
//! results. Two caches are kept with deliberately asymmetric update rules:
//!
//! - the **raw document** is overwritten on every transport success, even
//!   when the subsequent parse fails — a malformed upstream document is
//!   then visible in diagnostics exactly as it was received;
//! - the **parsed calendar** is replaced only on parse success and is left
//!   stale on `InvalidFormat`.

use std::sync::Arc;

use icalendar::Calendar;
use tracing::{debug, info};

use remotecal_core::EventView;

use crate::client::CalendarClient;
use crate::config::SourceConfig;
use crate::error::UpdateResult;
use crate::ics::{extract_events, parse_calendar};

/// Fetches, parses, and caches a single remote calendar source.
///
/// The source configuration is immutable for the pipeline's lifetime;
/// reconfiguration means constructing a new pipeline.
#[derive(Debug)]
pub struct RefreshPipeline {
    client: CalendarClient,
    source: SourceConfig,
    /// Latest successfully fetched raw document.
    ics: Option<String>,
    /// Latest successfully parsed calendar.
    calendar: Option<Arc<Calendar>>,
}

impl RefreshPipeline {
    /// Creates a pipeline with a fresh HTTP client.
    pub fn new(source: SourceConfig) -> UpdateResult<Self> {
        Ok(Self::with_client(CalendarClient::new()?, source))
    }

    /// Creates a pipeline with an existing HTTP client.
    pub fn with_client(client: CalendarClient, source: SourceConfig) -> Self {
        Self {
            client,
            source,
            ics: None,
            calendar: None,
        }
    }

    /// Runs one refresh cycle and returns the newly parsed calendar.
    ///
    /// # Errors
    ///
    /// - `Timeout` / `Unreachable`: the fetch failed; neither cache changes
    /// - `InvalidFormat`: the fetch succeeded but the body did not parse;
    ///   the raw document is updated, the parsed calendar is not
    pub async fn refresh(&mut self) -> UpdateResult<Arc<Calendar>> {
        let body = self.client.fetch(&self.source).await?;

        // Raw document updates unconditionally once transport succeeded.
        let parsed = parse_calendar(&body);
        self.ics = Some(body);

        let calendar = Arc::new(parsed.inspect_err(|e| {
            debug!(kind = e.kind().as_str(), "Fetched document failed to parse");
        })?);
        self.calendar = Some(Arc::clone(&calendar));

        info!(url = %self.source.url, "Calendar refreshed");
        Ok(calendar)
    }

    /// Returns the source configuration.
    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    /// Returns the latest successfully fetched raw document.
    pub fn raw_document(&self) -> Option<&str> {
        self.ics.as_deref()
    }

    /// Returns the latest successfully parsed calendar.
    pub fn calendar(&self) -> Option<Arc<Calendar>> {
        self.calendar.clone()
    }

    /// Returns event views from the latest successfully parsed calendar.
    pub fn events(&self) -> Vec<EventView> {
        self.calendar
            .as_deref()
            .map(extract_events)
            .unwrap_or_default()
    }
}
