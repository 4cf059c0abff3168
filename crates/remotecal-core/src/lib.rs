//! Core types: event views, ICS redaction, tracing setup.

pub mod event;
pub mod redact;
pub mod tracing;

pub use event::{EventTime, EventView};
pub use redact::redact_ics;
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
