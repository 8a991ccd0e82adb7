use anyhow::Result;
use shiftcal_core::ShiftBoard;

use crate::render::Render;

pub fn run(board: &ShiftBoard) -> Result<()> {
    println!("{}", board.grid().render());
    Ok(())
}
