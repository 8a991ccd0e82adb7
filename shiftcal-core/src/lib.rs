//! Core of shiftcal: shift templates placed on a month calendar.
//!
//! - `registry` and `shift_type` for the reusable templates
//! - `schedule` for the shifts placed in one month
//! - `selection` and `drag` for the two placement paths
//! - `export` for CSV and iCal output
//! - `board` ties them together behind one owner, [`ShiftBoard`]

pub mod board;
pub mod calendar_grid;
pub mod config;
pub mod constants;
pub mod drag;
pub mod error;
pub mod export;
pub mod month;
pub mod registry;
pub mod schedule;
pub mod selection;
pub mod shift_type;
pub mod storage;

pub use board::{BoardSettings, Dialogs, ShiftBoard};
pub use error::{ShiftError, ShiftResult};
