//! Month grid layout for rendering.

use chrono::Datelike;

use crate::month::YearMonth;
use crate::schedule::{Assignment, MonthSchedule};

pub const DAYS_PER_WEEK: usize = 7;

pub const WEEKDAY_HEADERS: [&str; DAYS_PER_WEEK] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCell {
    /// Padding before the 1st or after the last day
    Blank,
    Day {
        day: u32,
        /// `YYYY-MM-DD`
        date: String,
        assignment: Option<Assignment>,
    },
}

/// A month laid out in Monday-first weeks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    pub month: YearMonth,
    pub cells: Vec<GridCell>,
}

impl CalendarGrid {
    pub fn build(schedule: &MonthSchedule) -> Self {
        let month = schedule.month();
        let leading = month.first_day().weekday().num_days_from_monday() as usize;
        let days = month.days_in_month();

        let mut cells = vec![GridCell::Blank; leading];

        for day in 1..=days {
            let date = month.date_string(day);
            let assignment = schedule.get(&date).cloned();
            cells.push(GridCell::Day {
                day,
                date,
                assignment,
            });
        }

        let trailing = (DAYS_PER_WEEK - cells.len() % DAYS_PER_WEEK) % DAYS_PER_WEEK;
        cells.extend(std::iter::repeat_n(GridCell::Blank, trailing));

        CalendarGrid { month, cells }
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }
}
