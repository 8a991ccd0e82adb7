use anyhow::Result;
use owo_colors::OwoColorize;
use shiftcal_core::ShiftBoard;
use shiftcal_core::constants::DRAG_PAYLOAD_MIME;
use shiftcal_core::selection::DayTarget;

use crate::dialogs::TerminalDialogs;
use crate::render::Render;

/// Select the template, then click the day.
pub fn place(
    board: &mut ShiftBoard,
    date: &str,
    label: &str,
    dialogs: &mut TerminalDialogs,
) -> Result<()> {
    board.click_template(label)?;
    let placed = board.click_day(date, DayTarget::Cell, dialogs)?;
    report_placement(board, date, placed);
    Ok(())
}

pub fn drop_payload(
    board: &mut ShiftBoard,
    date: &str,
    payload: &str,
    dialogs: &mut TerminalDialogs,
) -> Result<()> {
    let placed = board.drop_on_day(date, payload, dialogs)?;
    report_placement(board, date, placed);
    Ok(())
}

/// The payload goes to stdout on its own so it can be piped into `drop`.
pub fn payload(board: &mut ShiftBoard, label: &str) -> Result<()> {
    println!("{}", board.begin_drag(label)?);
    eprintln!("{}", format!("({DRAG_PAYLOAD_MIME})").dimmed());
    Ok(())
}

pub fn remove(board: &mut ShiftBoard, date: &str, dialogs: &mut TerminalDialogs) -> Result<()> {
    let Some(existing) = board.schedule().get(date).cloned() else {
        println!("{}", format!("No shift on {date}").dimmed());
        return Ok(());
    };

    if board.click_placed_shift(date, dialogs)? {
        println!("{} {} {}", "Removed:".red(), existing.render(), date);
    }
    Ok(())
}

fn report_placement(board: &ShiftBoard, date: &str, placed: bool) {
    if !placed {
        return;
    }
    if let Some(assignment) = board.schedule().get(date) {
        println!("{} {} {}", "Placed:".green(), assignment.render(), date);
    }
}
