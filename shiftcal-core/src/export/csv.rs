//! CSV generation in the calendar-import layout most calendar apps accept.

use tracing::warn;

use super::end_date;
use crate::month::parse_date;
use crate::schedule::Assignment;

const HEADER: &str =
    "Subject,Start Date,Start Time,End Date,End Time,All Day Event,Description,Location,Private";

/// Render one row per assignment. Entries whose date does not parse are
/// skipped.
pub fn generate_csv(entries: &[(&str, &Assignment)]) -> String {
    let mut out = String::with_capacity(HEADER.len() + entries.len() * 64);
    out.push_str(HEADER);
    out.push('\n');

    for (date, assignment) in entries {
        let Some(start) = parse_date(date) else {
            warn!(date = %date, "Skipping shift with invalid date");
            continue;
        };
        let end = end_date(start, assignment);

        let row = [
            quote(&assignment.label),
            start.format("%m/%d/%Y").to_string(),
            assignment.start_time.clone(),
            end.format("%m/%d/%Y").to_string(),
            assignment.end_time.clone(),
            "FALSE".to_string(),
            quote(""),
            quote(""),
            "TRUE".to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Always-quoted field with embedded quotes doubled.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
