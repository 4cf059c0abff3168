//! Support-export diagnostics.
//!
//! On demand, assembles a snapshot of the adapter's state for attaching to
//! a support request: current time in the configured timezone, both
//! timezone identifiers, and the latest raw document with personal data
//! redacted. The snapshot is recomputed fresh on every request and is never
//! persisted here; serialization of the map is owned by the caller.

use chrono::{Local, Utc};
use serde_json::{Map, Value};

use remotecal_core::redact_ics;

use crate::config::PollerConfig;

/// Marker used for the `ics` key before any fetch has succeeded.
pub const NO_DOCUMENT_MARKER: &str = "No calendar fetched yet";

/// Builds a diagnostics snapshot.
///
/// `raw_document` is the pipeline's latest successfully fetched text; pass
/// `None` when nothing has been fetched yet, which yields the explicit
/// [`NO_DOCUMENT_MARKER`] instead of an empty redaction.
pub fn snapshot(config: &PollerConfig, raw_document: Option<&str>) -> Map<String, Value> {
    let now = Utc::now().with_timezone(&config.timezone);

    let mut payload = Map::new();
    payload.insert("now".to_string(), Value::String(now.to_rfc3339()));
    payload.insert(
        "timezone".to_string(),
        Value::String(config.timezone.name().to_string()),
    );
    payload.insert(
        "system_timezone".to_string(),
        Value::String(system_timezone()),
    );
    payload.insert(
        "ics".to_string(),
        Value::String(match raw_document {
            Some(ics) => redact_ics(ics).join("\n"),
            None => NO_DOCUMENT_MARKER.to_string(),
        }),
    );
    payload
}

/// The system's local UTC offset, e.g. `+02:00`.
fn system_timezone() -> String {
    Local::now().offset().to_string()
}
