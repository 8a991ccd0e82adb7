use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use owo_colors::OwoColorize;
use shiftcal_core::ShiftBoard;
use shiftcal_core::export::{ExportFormat, ExportScope};

use crate::dialogs::TerminalDialogs;

/// Scope asked for on the command line. `--all` means every month and an
/// explicit `--month` means that month only. Without either, the configured
/// scope applies.
pub fn requested_scope(all: bool, month_given: bool) -> Option<ExportScope> {
    if all {
        Some(ExportScope::AllMonths)
    } else if month_given {
        Some(ExportScope::CurrentMonth)
    } else {
        None
    }
}

pub fn run(
    board: &mut ShiftBoard,
    format: ExportFormat,
    scope: Option<ExportScope>,
    out_dir: &Path,
    dialogs: &mut TerminalDialogs,
) -> Result<()> {
    if scope.is_some_and(|wanted| wanted != board.settings().export_scope) {
        board.toggle_export_scope();
    }

    let Some(file) = board.export(format, Utc::now(), dialogs)? else {
        return Ok(());
    };

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Could not create {}", out_dir.display()))?;
    let path = out_dir.join(&file.filename);
    std::fs::write(&path, &file.content)
        .with_context(|| format!("Could not write {}", path.display()))?;

    println!(
        "{} {} {}",
        "Exported:".green(),
        path.display(),
        format!("({})", board.settings().export_scope.label()).dimmed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_month_overrides_configured_all() {
        assert_eq!(requested_scope(false, true), Some(ExportScope::CurrentMonth));
        assert_eq!(requested_scope(true, false), Some(ExportScope::AllMonths));
        assert_eq!(requested_scope(false, false), None);
    }
}
