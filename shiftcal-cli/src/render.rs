//! Terminal rendering for shiftcal types.
//!
//! Extension traits that draw shift types, placed shifts and month grids
//! with owo_colors, using each shift's own color as its background.

use owo_colors::OwoColorize;
use shiftcal_core::calendar_grid::{CalendarGrid, GridCell, WEEKDAY_HEADERS};
use shiftcal_core::schedule::Assignment;
use shiftcal_core::shift_type::{ShiftType, parse_hex_color, text_color_for};

/// Width of one day column in the month grid
const CELL_WIDTH: usize = 12;

pub trait Render {
    fn render(&self) -> String;
}

/// Paint `text` on `color`, with a readable text color on top.
fn swatch(text: &str, color: &str) -> String {
    let Some((r, g, b)) = parse_hex_color(color) else {
        return text.to_string();
    };

    if text_color_for(color) == "#fff" {
        text.on_truecolor(r, g, b).white().to_string()
    } else {
        text.on_truecolor(r, g, b).black().to_string()
    }
}

fn fit(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

impl Render for ShiftType {
    fn render(&self) -> String {
        let label = swatch(&format!(" {} ", self.label), &self.color);
        let times = format!("{}-{}", self.start_time, self.end_time);

        if self.crosses_midnight() {
            format!("{} {} {}", label, times, "(overnight)".dimmed())
        } else {
            format!("{} {}", label, times)
        }
    }
}

impl Render for Assignment {
    fn render(&self) -> String {
        swatch(&self.display_label(), &self.color)
    }
}

impl Render for CalendarGrid {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("📅 {}", self.month).bold().to_string());

        let header: String = WEEKDAY_HEADERS.iter().map(|h| fit(h, CELL_WIDTH)).collect();
        lines.push(header.dimmed().to_string());

        for week in self.weeks() {
            let mut days = String::new();
            let mut shifts = String::new();

            for cell in week {
                match cell {
                    GridCell::Blank => {
                        days.push_str(&fit("", CELL_WIDTH));
                        shifts.push_str(&fit("", CELL_WIDTH));
                    }
                    GridCell::Day {
                        day, assignment, ..
                    } => {
                        days.push_str(&fit(&day.to_string(), CELL_WIDTH));
                        match assignment {
                            Some(a) => {
                                // Leave one column of space between neighbours
                                let label = fit(&a.label, CELL_WIDTH - 1);
                                shifts.push_str(&swatch(&label, &a.color));
                                shifts.push(' ');
                            }
                            None => shifts.push_str(&fit("", CELL_WIDTH)),
                        }
                    }
                }
            }

            lines.push(days.trim_end().to_string());
            lines.push(shifts);
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("Day", 5), "Day  ");
        assert_eq!(fit("Overnight", 4), "Over");
    }

    #[test]
    fn swatch_falls_back_to_plain_text() {
        assert_eq!(swatch("Day", "blue"), "Day");
    }
}
