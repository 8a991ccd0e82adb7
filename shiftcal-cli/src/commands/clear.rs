use anyhow::Result;
use shiftcal_core::ShiftBoard;

use crate::dialogs::TerminalDialogs;

pub fn run(board: &mut ShiftBoard, dialogs: &mut TerminalDialogs) -> Result<()> {
    board.clear_all_data(dialogs)?;
    Ok(())
}
