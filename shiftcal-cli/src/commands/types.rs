use anyhow::Result;
use owo_colors::OwoColorize;
use shiftcal_core::ShiftBoard;
use shiftcal_core::shift_type::{ShiftType, ShiftTypePatch};

use crate::dialogs::TerminalDialogs;
use crate::render::Render;

pub fn list(board: &ShiftBoard) -> Result<()> {
    if board.shift_types().is_empty() {
        println!("{}", "No shift types defined.".dimmed());
        return Ok(());
    }

    for shift_type in board.shift_types() {
        println!("  {}", shift_type.render());
    }
    Ok(())
}

pub fn add(
    board: &mut ShiftBoard,
    label: String,
    start: String,
    end: String,
    color: String,
) -> Result<()> {
    board.add_shift_type(ShiftType::new(label, color, start, end))?;

    if let Some(added) = board.shift_types().last() {
        println!("{} {}", "Added:".green(), added.render());
    }
    Ok(())
}

pub fn edit(
    board: &mut ShiftBoard,
    label: &str,
    start: Option<String>,
    end: Option<String>,
    color: Option<String>,
) -> Result<()> {
    let patch = ShiftTypePatch {
        color,
        start_time: start,
        end_time: end,
    };

    if patch == ShiftTypePatch::default() {
        anyhow::bail!("Nothing to change. Use --start, --end or --color.");
    }

    let updated = board.update_shift_type(label, patch)?;
    println!("{} {}", "Updated:".yellow(), updated.render());
    println!(
        "{}",
        "Shifts already placed on the calendar keep their old times.".dimmed()
    );
    Ok(())
}

pub fn delete(board: &mut ShiftBoard, label: &str, dialogs: &mut TerminalDialogs) -> Result<()> {
    if board.delete_shift_type(label, dialogs)? {
        println!("{}", format!("Deleted: {label}").red());
    }
    Ok(())
}
