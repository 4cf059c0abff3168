//! ICS redaction for support export.
//!
//! Raw calendar documents contain personal data (attendees, organizers,
//! event titles and descriptions). Before a document is attached to a
//! diagnostics export, it is run through [`redact_ics`], which keeps only
//! structural and scheduling properties and masks everything else.
//!
//! The pass is line-oriented and does not require the input to be a valid
//! calendar: a half-fetched or malformed document is still redacted line by
//! line, which is exactly what makes it useful for diagnosing bad upstream
//! data.

/// Properties that pass through unredacted.
///
/// Everything here is structural (component markers, calendar metadata) or
/// pure scheduling data (dates, recurrence, status). Anything not in this
/// list is assumed to be able to carry personal data.
const SAFE_PROPERTIES: &[&str] = &[
    "BEGIN",
    "END",
    "VERSION",
    "PRODID",
    "CALSCALE",
    "METHOD",
    "UID",
    "DTSTART",
    "DTEND",
    "DTSTAMP",
    "DURATION",
    "RRULE",
    "RDATE",
    "EXDATE",
    "RECURRENCE-ID",
    "SEQUENCE",
    "STATUS",
    "TRANSP",
    "CLASS",
    "PRIORITY",
    "CREATED",
    "LAST-MODIFIED",
    "TZID",
    "TZNAME",
    "TZOFFSETFROM",
    "TZOFFSETTO",
    "TZURL",
];

/// Mask substituted for redacted parameters and values.
const MASK: &str = "***";

/// Redacts personal data from a raw ICS document.
///
/// Returns the redacted lines. Properties on the safelist are kept intact;
/// for every other property the parameters and value are replaced with
/// `***`, and folded continuation lines follow the fate of the property
/// they continue. Empty input yields no lines.
pub fn redact_ics(ics: &str) -> Vec<String> {
    let mut out = Vec::new();
    // Whether the most recent property line was kept. Continuation lines
    // (RFC 5545 folding: leading space or tab) belong to that property.
    let mut keeping = false;

    for raw_line in ics.lines() {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

        if line.starts_with(' ') || line.starts_with('\t') {
            if keeping {
                out.push(line.to_string());
            }
            continue;
        }

        match property_name(line) {
            Some(name) if is_safe(name) => {
                keeping = true;
                out.push(line.to_string());
            }
            Some(name) => {
                keeping = false;
                out.push(format!("{name}:{MASK}"));
            }
            None => {
                // Not a property line at all; mask it wholesale.
                keeping = false;
                if !line.is_empty() {
                    out.push(MASK.to_string());
                }
            }
        }
    }

    out
}

/// Extracts the property name from a content line (`NAME;PARAMS:VALUE`).
fn property_name(line: &str) -> Option<&str> {
    let end = line.find([';', ':'])?;
    let name = &line[..end];
    if name.is_empty() { None } else { Some(name) }
}

fn is_safe(name: &str) -> bool {
    SAFE_PROPERTIES
        .iter()
        .any(|safe| safe.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Example//Calendar//EN\r\n\
BEGIN:VEVENT\r\n\
UID:event-1@example.com\r\n\
DTSTART:20250601T100000Z\r\n\
DTEND:20250601T110000Z\r\n\
SUMMARY:Quarterly review with Jane\r\n\
ORGANIZER;CN=Jane Doe:mailto:jane.doe@example.com\r\n\
ATTENDEE;CN=John Smith;PARTSTAT=ACCEPTED:mailto:john.smith@example.com\r\n\
LOCATION:Jane's office\r\n\
RRULE:FREQ=WEEKLY\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn keeps_structural_and_scheduling_properties() {
        let lines = redact_ics(SAMPLE);

        assert!(lines.contains(&"BEGIN:VCALENDAR".to_string()));
        assert!(lines.contains(&"UID:event-1@example.com".to_string()));
        assert!(lines.contains(&"DTSTART:20250601T100000Z".to_string()));
        assert!(lines.contains(&"RRULE:FREQ=WEEKLY".to_string()));
        assert!(lines.contains(&"END:VCALENDAR".to_string()));
    }

    #[test]
    fn masks_personal_properties() {
        let lines = redact_ics(SAMPLE);
        let joined = lines.join("\n");

        assert!(!joined.contains("jane.doe@example.com"));
        assert!(!joined.contains("john.smith@example.com"));
        assert!(!joined.contains("Jane Doe"));
        assert!(!joined.contains("Quarterly review"));
        assert!(joined.contains("SUMMARY:***"));
        assert!(joined.contains("ORGANIZER:***"));
        assert!(joined.contains("ATTENDEE:***"));
    }

    #[test]
    fn masks_parameters_of_redacted_properties() {
        let lines = redact_ics("ATTENDEE;CN=Secret Name:mailto:a@b.example\n");
        assert_eq!(lines, vec!["ATTENDEE:***".to_string()]);
    }

    #[test]
    fn continuation_lines_follow_their_property() {
        let ics = "DESCRIPTION:a very long\r\n personal description\r\nDTSTART:20250601\r\n continuation-of-dtstart\r\n";
        let lines = redact_ics(ics);

        assert_eq!(
            lines,
            vec![
                "DESCRIPTION:***".to_string(),
                "DTSTART:20250601".to_string(),
                " continuation-of-dtstart".to_string(),
            ]
        );
    }

    #[test]
    fn empty_input_yields_no_lines() {
        assert!(redact_ics("").is_empty());
    }

    #[test]
    fn garbage_lines_are_masked() {
        let lines = redact_ics("this is not a calendar at all\n");
        assert_eq!(lines, vec![MASK.to_string()]);
    }

    #[test]
    fn property_name_extraction() {
        assert_eq!(property_name("SUMMARY:hello"), Some("SUMMARY"));
        assert_eq!(property_name("ATTENDEE;CN=x:mailto:a@b"), Some("ATTENDEE"));
        assert_eq!(property_name("no separator here"), None);
        assert_eq!(property_name(":leading"), None);
    }
}
