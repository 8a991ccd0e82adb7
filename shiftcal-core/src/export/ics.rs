//! iCal generation.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, EventLike};
use tracing::warn;

use super::end_date;
use crate::constants::{ICAL_PRODID, UID_DOMAIN};
use crate::month::parse_date;
use crate::schedule::Assignment;

const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Generate a VCALENDAR with one VEVENT per assignment.
///
/// Times are wall-clock times in `tz`, converted to UTC. An entry with a
/// malformed date or time, or a time that does not exist in `tz`, is skipped.
pub fn generate_ics(entries: &[(&str, &Assignment)], tz: Tz, now: DateTime<Utc>) -> String {
    let mut cal = Calendar::new();
    let dtstamp = now.format(UTC_FORMAT).to_string();

    for (index, (date, assignment)) in entries.iter().enumerate() {
        let Some((start, end)) = event_bounds(date, assignment, tz) else {
            warn!(
                date = %date,
                start = %assignment.start_time,
                end = %assignment.end_time,
                "Skipping shift with invalid date or time"
            );
            continue;
        };

        let mut event = icalendar::Event::new();
        event.uid(&event_uid(date, &assignment.start_time, index));
        event.add_property("DTSTAMP", &dtstamp);
        event.add_property("DTSTART", start.format(UTC_FORMAT).to_string());
        event.add_property("DTEND", end.format(UTC_FORMAT).to_string());
        event.summary(&assignment.label);

        cal.push(event.done());
    }

    set_prodid(&cal.done().to_string())
}

/// Unique within one export: the entry index disambiguates equal dates and
/// start times.
fn event_uid(date: &str, start_time: &str, index: usize) -> String {
    format!(
        "shift-{}-{}-{}@{}",
        date,
        start_time.replace(':', ""),
        index,
        UID_DOMAIN
    )
}

/// Start and end instants in UTC, with the overnight rollover applied to the
/// end date.
fn event_bounds(
    date: &str,
    assignment: &Assignment,
    tz: Tz,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start_date = parse_date(date)?;
    let start = to_utc(start_date, parse_time(&assignment.start_time)?, tz)?;
    let end = to_utc(
        end_date(start_date, assignment),
        parse_time(&assignment.end_time)?,
        tz,
    )?;
    Some((start, end))
}

/// Strict `HH:MM`.
fn parse_time(s: &str) -> Option<NaiveTime> {
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());

    if !shape_ok {
        return None;
    }
    let hour: u32 = s[0..2].parse().ok()?;
    let minute: u32 = s[3..5].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn to_utc(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The icalendar crate writes its own PRODID; swap in ours, followed by
/// exactly one CALSCALE.
fn set_prodid(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("CALSCALE:") {
            continue;
        }
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(ICAL_PRODID);
            result.push_str("\r\nCALSCALE:GREGORIAN");
        } else {
            result.push_str(line);
        }
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(label: &str, start: &str, end: &str) -> Assignment {
        Assignment {
            label: label.into(),
            color: "#4682b4".into(),
            start_time: start.into(),
            end_time: end.into(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 9, 30, 0).unwrap()
    }

    fn property<'a>(ics: &'a str, name: &str) -> Vec<&'a str> {
        ics.lines()
            .filter_map(|l| l.strip_prefix(name).and_then(|rest| rest.strip_prefix(':')))
            .collect()
    }

    #[test]
    fn calendar_header() {
        let day = shift("Day", "08:00", "16:00");
        let ics = generate_ics(&[("2024-03-15", &day)], Tz::UTC, now());

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"), "ICS:\n{ics}");
        assert!(ics.trim_end().ends_with("END:VCALENDAR"));
        assert_eq!(property(&ics, "VERSION"), vec!["2.0"]);
        assert_eq!(property(&ics, "PRODID"), vec![ICAL_PRODID]);
        assert_eq!(property(&ics, "CALSCALE"), vec!["GREGORIAN"]);
    }

    #[test]
    fn same_day_event() {
        let day = shift("Day", "08:00", "16:00");
        let ics = generate_ics(&[("2024-03-15", &day)], Tz::UTC, now());

        assert_eq!(property(&ics, "DTSTART"), vec!["20240315T080000Z"]);
        assert_eq!(property(&ics, "DTEND"), vec!["20240315T160000Z"]);
        assert_eq!(property(&ics, "DTSTAMP"), vec!["20240320T093000Z"]);
        assert_eq!(property(&ics, "SUMMARY"), vec!["Day"]);
        assert_eq!(
            property(&ics, "UID"),
            vec!["shift-2024-03-15-0800-0@shiftcal"]
        );
    }

    #[test]
    fn overnight_event_ends_next_day() {
        let night = shift("Night", "20:00", "04:00");
        let ics = generate_ics(&[("2024-03-15", &night)], Tz::UTC, now());

        assert_eq!(property(&ics, "DTSTART"), vec!["20240315T200000Z"]);
        assert_eq!(property(&ics, "DTEND"), vec!["20240316T040000Z"]);
    }

    #[test]
    fn uids_are_unique_per_export() {
        let day = shift("Day", "08:00", "16:00");
        let ics = generate_ics(
            &[("2024-03-15", &day), ("2024-03-16", &day), ("2024-03-17", &day)],
            Tz::UTC,
            now(),
        );

        let mut uids = property(&ics, "UID");
        assert_eq!(uids.len(), 3);
        uids.sort();
        uids.dedup();
        assert_eq!(uids.len(), 3);
    }

    #[test]
    fn malformed_entries_are_skipped_individually() {
        let good = shift("Day", "08:00", "16:00");
        let bad_time = shift("Late", "8:00", "16:00");
        let impossible = shift("Late", "25:00", "26:00");
        let ics = generate_ics(
            &[
                ("2024-03-15", &good),
                ("2024-03-16", &bad_time),
                ("2024-03-17", &impossible),
                ("2024-3-18", &good),
            ],
            Tz::UTC,
            now(),
        );

        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
        assert_eq!(property(&ics, "DTSTART"), vec!["20240315T080000Z"]);
    }

    #[test]
    fn wall_clock_converts_from_configured_zone() {
        let day = shift("Day", "08:00", "16:00");
        let ics = generate_ics(&[("2024-07-01", &day)], Tz::Europe__Berlin, now());

        // CEST is UTC+2
        assert_eq!(property(&ics, "DTSTART"), vec!["20240701T060000Z"]);
        assert_eq!(property(&ics, "DTEND"), vec!["20240701T140000Z"]);
    }

    #[test]
    fn nonexistent_local_time_is_skipped() {
        // Clocks jump from 02:00 to 03:00 in Berlin on 31 March 2024
        let early = shift("Early", "02:30", "10:00");
        let ics = generate_ics(&[("2024-03-31", &early)], Tz::Europe__Berlin, now());
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 0);
    }

    #[test]
    fn ambiguous_local_time_takes_earlier_instant() {
        // Clocks fall back from 03:00 CEST to 02:00 CET on 27 October 2024
        let early = shift("Early", "02:30", "06:00");
        let ics = generate_ics(&[("2024-10-27", &early)], Tz::Europe__Berlin, now());

        assert_eq!(property(&ics, "DTSTART"), vec!["20241027T003000Z"]);
        assert_eq!(property(&ics, "DTEND"), vec!["20241027T050000Z"]);
    }
}
