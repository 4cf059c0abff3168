//! ICS parsing.
//!
//! Parses a fetched document into an [`icalendar::Calendar`] and converts
//! its VEVENT components into [`EventView`]s for downstream consumers. The
//! pipeline introduces no transformation of its own: the parsed calendar is
//! exactly what the parser produced for the fetched text.

use chrono::{TimeZone, Utc};
use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event, EventLike,
};
use tracing::trace;

use remotecal_core::{EventTime, EventView};

use crate::error::{UpdateError, UpdateResult};

/// Parses ICS text into a calendar.
///
/// # Errors
///
/// Returns an `InvalidFormat` failure when the text is not a valid ICS
/// document.
pub fn parse_calendar(ics: &str) -> UpdateResult<Calendar> {
    if !has_vcalendar_marker(ics) {
        return Err(UpdateError::invalid_format(
            "not an iCalendar document (missing BEGIN:VCALENDAR)",
        ));
    }
    ics.parse::<Calendar>().map_err(UpdateError::invalid_format)
}

/// Checks for a `BEGIN:VCALENDAR` line, case-insensitively, without
/// copying the document.
fn has_vcalendar_marker(ics: &str) -> bool {
    const MARKER: &str = "BEGIN:VCALENDAR";
    ics.lines().any(|line| {
        line.trim_start()
            .get(..MARKER.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(MARKER))
    })
}

/// Extracts event views from a parsed calendar.
///
/// Components without a UID or start time are skipped; everything else is
/// passed through as-is.
pub fn extract_events(calendar: &Calendar) -> Vec<EventView> {
    calendar
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => convert_event(event),
            _ => None,
        })
        .collect()
}

/// Converts a single VEVENT into an event view.
fn convert_event(event: &Event) -> Option<EventView> {
    let uid = event.get_uid()?;
    let start = event.get_start()?;
    // Events without an explicit end are treated as instantaneous.
    let end = event.get_end().or_else(|| event.get_start())?;

    let mut view = EventView::new(uid, convert_date_time(start), convert_date_time(end));

    if let Some(summary) = event.get_summary() {
        view = view.with_summary(summary);
    }
    if let Some(description) = event.get_description() {
        view = view.with_description(description);
    }
    if let Some(location) = event.get_location() {
        view = view.with_location(location);
    }
    if event.property_value("RRULE").is_some() || event.property_value("RECURRENCE-ID").is_some() {
        view = view.with_recurring(true);
    }

    trace!(uid = %view.uid, summary = ?view.summary, "Converted event");
    Some(view)
}

/// Converts an icalendar date-or-datetime into an [`EventTime`].
fn convert_date_time(dt: DatePerhapsTime) -> EventTime {
    match dt {
        DatePerhapsTime::Date(date) => EventTime::from_date(date),
        DatePerhapsTime::DateTime(cdt) => {
            let utc_dt = match cdt {
                CalendarDateTime::Utc(dt) => dt,
                CalendarDateTime::Floating(naive) => Utc.from_utc_datetime(&naive),
                // Without a timezone database lookup, treat zoned datetimes
                // as UTC.
                CalendarDateTime::WithTimezone { date_time, tzid: _ } => {
                    Utc.from_utc_datetime(&date_time)
                }
            };
            EventTime::from_utc(utc_dt)
        }
    }
}
