//! Remote calendar adapter: fetch, parse, cache, diagnostics.
//!
//! This crate periodically fetches a remote ICS document over HTTP(S),
//! parses it into an in-memory calendar, caches the result, and exposes a
//! diagnostics snapshot for support exports.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   fixed interval / manual trigger
//! │ Coordinator  │◄──────────────────────────────────
//! └──────┬───────┘
//!        │ refresh()
//!        ▼
//! ┌──────────────┐  GET   ┌────────────────┐
//! │RefreshPipeline│──────►│ CalendarClient │──► remote ICS feed
//! └──────┬───────┘        └────────────────┘
//!        │ raw text (always)      │ parsed calendar (on parse success)
//!        ▼                        ▼
//!   raw document cache      calendar cache ──► watch channel / EventView
//! ```
//!
//! Failures are classified into [`UpdateErrorKind::Timeout`],
//! [`UpdateErrorKind::Unreachable`], and [`UpdateErrorKind::InvalidFormat`];
//! all are terminal for the cycle and the next attempt is the next scheduled
//! interval.

pub mod client;
pub mod config;
pub mod coordinator;
pub mod diagnostics;
pub mod error;
pub mod ics;
pub mod pipeline;

pub use client::CalendarClient;
pub use config::{ConfigError, PollerConfig, SourceConfig};
pub use coordinator::{
    Coordinator, CoordinatorCommand, CoordinatorHandle, CoordinatorState, LastFailure,
    SharedCoordinatorState,
};
pub use diagnostics::{NO_DOCUMENT_MARKER, snapshot};
pub use error::{UpdateError, UpdateErrorKind, UpdateResult};
pub use ics::{extract_events, parse_calendar};
pub use pipeline::RefreshPipeline;
