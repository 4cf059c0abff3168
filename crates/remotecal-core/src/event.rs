//! Event view types.
//!
//! This module provides the read-only projection of parsed calendar events
//! that is handed to downstream consumers (event queries, exports):
//! - [`EventTime`]: an event boundary, either a datetime or an all-day date
//! - [`EventView`]: a single calendar event

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A boundary (start or end) of a feed event.
///
/// ICS feeds mark event boundaries either as a `DATE-TIME` or, for all-day
/// entries, a bare `DATE`. The distinction survives into this type so that
/// query consumers can render all-day events without inventing a midnight
/// timestamp. Zoned datetimes from the feed are normalized to UTC before
/// they get here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum EventTime {
    /// A concrete instant, normalized to UTC.
    DateTime(DateTime<Utc>),
    /// An all-day date with no time component.
    AllDay(NaiveDate),
}

impl EventTime {
    /// Wraps a UTC instant.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }

    /// Wraps an instant in any timezone, normalizing it to UTC.
    pub fn from_zoned<Tz: TimeZone>(dt: DateTime<Tz>) -> Self {
        Self::DateTime(dt.with_timezone(&Utc))
    }

    /// Wraps an all-day date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::AllDay(date)
    }

    /// Whether this boundary came from a bare `DATE`.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }

    /// The instant, unless this is an all-day boundary.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            Self::AllDay(_) => None,
        }
    }

    /// The date, if this is an all-day boundary.
    pub fn as_date(&self) -> Option<&NaiveDate> {
        match self {
            Self::DateTime(_) => None,
            Self::AllDay(date) => Some(date),
        }
    }
}

/// A read-only view of a single calendar event.
///
/// Produced from the latest successfully parsed calendar; consumers never
/// mutate it and never observe a partially updated calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventView {
    /// Unique identifier of the event (ICS UID).
    pub uid: String,
    /// Event title, if present.
    pub summary: Option<String>,
    /// Longer description, if present.
    pub description: Option<String>,
    /// Location, if present.
    pub location: Option<String>,
    /// Start of the event.
    pub start: EventTime,
    /// End of the event.
    pub end: EventTime,
    /// Whether the event carries a recurrence rule or is a recurrence
    /// instance.
    pub recurring: bool,
}

impl EventView {
    /// Creates a new event view with the required fields.
    pub fn new(uid: impl Into<String>, start: EventTime, end: EventTime) -> Self {
        Self {
            uid: uid.into(),
            summary: None,
            description: None,
            location: None,
            start,
            end,
            recurring: false,
        }
    }

    /// Builder: set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder: mark the event as recurring.
    pub fn with_recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }

    /// Returns `true` if this is an all-day event.
    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn event_time_datetime() {
        let dt = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        let time = EventTime::from_utc(dt);

        assert!(!time.is_all_day());
        assert_eq!(time.as_datetime(), Some(&dt));
        assert_eq!(time.as_date(), None);
    }

    #[test]
    fn event_time_all_day() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let time = EventTime::from_date(date);

        assert!(time.is_all_day());
        assert_eq!(time.as_date(), Some(&date));
        assert_eq!(time.as_datetime(), None);
    }

    #[test]
    fn event_view_builders() {
        let start = EventTime::from_utc(Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap());
        let end = EventTime::from_utc(Utc.with_ymd_and_hms(2025, 6, 1, 11, 0, 0).unwrap());

        let event = EventView::new("uid-1", start, end)
            .with_summary("Standup")
            .with_location("Room 1")
            .with_recurring(true);

        assert_eq!(event.uid, "uid-1");
        assert_eq!(event.summary.as_deref(), Some("Standup"));
        assert_eq!(event.location.as_deref(), Some("Room 1"));
        assert!(event.recurring);
        assert!(!event.is_all_day());
    }

    #[test]
    fn event_view_serde_round_trip() {
        let event = EventView::new(
            "uid-2",
            EventTime::from_date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()),
            EventTime::from_date(NaiveDate::from_ymd_opt(2025, 6, 3).unwrap()),
        );

        let json = serde_json::to_string(&event).unwrap();
        let back: EventView = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
