//! Deadline parsing and formatting.
//!
//! Deadlines are stored and compared in UTC. Local time only appears at the
//! edges: user input is read as local time unless it carries an offset, and
//! output is rendered in local time.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

const INPUT_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];
const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";
const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parses a deadline typed by the user.
///
/// Accepts RFC 3339 (`2025-03-01T09:00:00Z`), local `YYYY-MM-DD HH:MM`, or a
/// bare local date, which means the end of that day (23:59).
pub fn parse_deadline(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(deadline) = DateTime::parse_from_rfc3339(input) {
        return Some(deadline.with_timezone(&Utc));
    }

    let naive = INPUT_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, INPUT_DATE_FORMAT)
                .ok()
                .and_then(|date| NaiveTime::from_hms_opt(23, 59, 0).map(|time| date.and_time(time)))
        })?;

    // Ambiguous local times (DST fold) take the earlier instant
    Local.from_local_datetime(&naive).earliest().map(|local| local.with_timezone(&Utc))
}

/// Renders a deadline in local time.
pub fn format_deadline(deadline: &DateTime<Utc>) -> String {
    deadline.with_timezone(&Local).format(OUTPUT_FORMAT).to_string()
}
