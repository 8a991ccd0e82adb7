//! CSV and iCal export of placed shifts.
//!
//! Both formats skip assignments without a label or times. When nothing is
//! left to export, [`export`] fails with [`ShiftError::EmptyExport`] and no
//! file is produced.

mod csv;
mod ics;

pub use csv::generate_csv;
pub use ics::generate_ics;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ShiftError, ShiftResult};
use crate::month::YearMonth;
use crate::schedule::Assignment;
use crate::storage::MonthEntries;

/// Which assignments an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportScope {
    #[default]
    CurrentMonth,
    AllMonths,
}

impl ExportScope {
    pub fn toggled(self) -> Self {
        match self {
            ExportScope::CurrentMonth => ExportScope::AllMonths,
            ExportScope::AllMonths => ExportScope::CurrentMonth,
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            ExportScope::CurrentMonth => "No shifts scheduled for the current month to export.",
            ExportScope::AllMonths => "No shifts scheduled in any month to export.",
        }
    }

    /// Short label for toggle buttons and status lines.
    pub fn label(&self) -> &'static str {
        match self {
            ExportScope::CurrentMonth => "Export Month",
            ExportScope::AllMonths => "Export All",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Ical,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Ical => "ics",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Ical => "text/calendar;charset=utf-8",
        }
    }
}

/// A generated file, ready to be saved by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub content: String,
}

/// Export settings that outlive a single export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub scope: ExportScope,
    /// Zone the entered wall-clock times belong to
    pub timezone: Tz,
}

/// Serialize `entries` into a file named after `scope`.
///
/// `month` is the visible month (used for single-month filenames), `now`
/// the export instant (DTSTAMP and all-months filenames).
pub fn export(
    entries: &MonthEntries,
    options: ExportOptions,
    month: YearMonth,
    now: DateTime<Utc>,
) -> ShiftResult<ExportFile> {
    let complete = complete_entries(entries);
    if complete.is_empty() {
        return Err(ShiftError::EmptyExport(options.scope));
    }

    let content = match options.format {
        ExportFormat::Csv => generate_csv(&complete),
        ExportFormat::Ical => generate_ics(&complete, options.timezone, now),
    };

    let file = ExportFile {
        filename: filename(options.format, options.scope, month, now),
        content_type: options.format.content_type(),
        content,
    };

    info!(
        filename = %file.filename,
        shifts = complete.len(),
        "Generated export"
    );
    Ok(file)
}

/// `shifts-YYYY-MM.ext` for one month, `all_shifts_YYYY-MM-DD.ext` for all.
pub fn filename(
    format: ExportFormat,
    scope: ExportScope,
    month: YearMonth,
    now: DateTime<Utc>,
) -> String {
    match scope {
        ExportScope::CurrentMonth => format!("shifts-{}.{}", month, format.extension()),
        ExportScope::AllMonths => format!(
            "all_shifts_{}.{}",
            now.format("%Y-%m-%d"),
            format.extension()
        ),
    }
}

/// Date a shift starting on `start` ends on: the next day for overnight
/// shifts, otherwise the same day.
pub fn end_date(start: NaiveDate, assignment: &Assignment) -> NaiveDate {
    if assignment.crosses_midnight() {
        start + Duration::days(1)
    } else {
        start
    }
}

fn complete_entries(entries: &MonthEntries) -> Vec<(&str, &Assignment)> {
    entries
        .iter()
        .filter(|(date, assignment)| {
            let complete = assignment.is_complete();
            if !complete {
                warn!(date = %date, "Skipping incomplete shift");
            }
            complete
        })
        .map(|(date, assignment)| (date.as_str(), assignment))
        .collect()
}
