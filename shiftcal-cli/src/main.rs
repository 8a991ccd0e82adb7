mod commands;
mod dialogs;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use shiftcal_core::config::ShiftcalConfig;
use shiftcal_core::export::ExportFormat;
use shiftcal_core::month::{YearMonth, parse_date};
use shiftcal_core::storage::{FileStore, Storage};
use shiftcal_core::{BoardSettings, ShiftBoard};

use crate::dialogs::TerminalDialogs;

#[derive(Parser)]
#[command(name = "shiftcal")]
#[command(about = "Plan shifts on a month calendar and export them to CSV or iCal")]
struct Cli {
    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage shift types
    Types {
        #[command(subcommand)]
        action: TypesAction,
    },
    /// Show a month with its shifts
    Month {
        /// Month to show (YYYY-MM), defaults to the current month
        month: Option<String>,
    },
    /// Place a shift type on a day
    Place {
        /// Day (YYYY-MM-DD)
        date: String,
        /// Shift type label
        label: String,
    },
    /// Place a shift from a drag payload (see `payload`)
    Drop {
        /// Day (YYYY-MM-DD)
        date: String,
        /// JSON payload
        payload: String,
    },
    /// Print the drag payload for a shift type
    Payload {
        label: String,
    },
    /// Remove the shift placed on a day
    Remove {
        /// Day (YYYY-MM-DD)
        date: String,
    },
    /// Export shifts to a file
    Export {
        format: FormatArg,

        /// Export only this month (YYYY-MM)
        #[arg(short, long, conflicts_with = "all")]
        month: Option<String>,

        /// Export every stored month instead of one
        #[arg(short, long)]
        all: bool,

        /// Directory to write the file to
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Delete all shifts and custom shift types
    Clear,
    /// Show configuration and data paths, or change a setting
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write one setting to the config file
    Set {
        /// data_dir, overwrite_policy, timezone or export_all
        key: String,
        value: String,
    },
}

#[derive(Subcommand)]
enum TypesAction {
    /// List shift types
    List,
    /// Add a shift type
    Add {
        label: String,

        /// Start time (HH:MM)
        #[arg(short, long)]
        start: String,

        /// End time (HH:MM), earlier than start for overnight shifts
        #[arg(short, long)]
        end: String,

        /// Color (#rrggbb)
        #[arg(short, long, default_value = "#cccccc")]
        color: String,
    },
    /// Change the times or color of a shift type
    Edit {
        label: String,

        #[arg(short, long)]
        start: Option<String>,

        #[arg(short, long)]
        end: Option<String>,

        #[arg(short, long)]
        color: Option<String>,
    },
    /// Delete a shift type
    Delete {
        label: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Ics,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Ics => ExportFormat::Ical,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {e:#}").red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Runs before loading so a broken config file can still be repaired
    if let Commands::Config {
        action: Some(ConfigAction::Set { key, value }),
    } = &cli.command
    {
        return commands::config::set(key, value);
    }

    let config = ShiftcalConfig::load()?;
    let mut dialogs = TerminalDialogs::new(cli.yes);

    match cli.command {
        Commands::Config { .. } => commands::config::run(&config),
        Commands::Types { action } => {
            let mut board = open_board(&config, YearMonth::current())?;
            match action {
                TypesAction::List => commands::types::list(&board),
                TypesAction::Add {
                    label,
                    start,
                    end,
                    color,
                } => commands::types::add(&mut board, label, start, end, color),
                TypesAction::Edit {
                    label,
                    start,
                    end,
                    color,
                } => commands::types::edit(&mut board, &label, start, end, color),
                TypesAction::Delete { label } => {
                    commands::types::delete(&mut board, &label, &mut dialogs)
                }
            }
        }
        Commands::Month { month } => {
            let board = open_board(&config, resolve_month(month.as_deref())?)?;
            commands::month::run(&board)
        }
        Commands::Place { date, label } => {
            let mut board = open_board(&config, month_of(&date)?)?;
            commands::place::place(&mut board, &date, &label, &mut dialogs)
        }
        Commands::Drop { date, payload } => {
            let mut board = open_board(&config, month_of(&date)?)?;
            commands::place::drop_payload(&mut board, &date, &payload, &mut dialogs)
        }
        Commands::Payload { label } => {
            let mut board = open_board(&config, YearMonth::current())?;
            commands::place::payload(&mut board, &label)
        }
        Commands::Remove { date } => {
            let mut board = open_board(&config, month_of(&date)?)?;
            commands::place::remove(&mut board, &date, &mut dialogs)
        }
        Commands::Export {
            format,
            month,
            all,
            out,
        } => {
            let scope = commands::export::requested_scope(all, month.is_some());
            let mut board = open_board(&config, resolve_month(month.as_deref())?)?;
            commands::export::run(&mut board, format.into(), scope, &out, &mut dialogs)
        }
        Commands::Clear => {
            let mut board = open_board(&config, YearMonth::current())?;
            commands::clear::run(&mut board, &mut dialogs)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn open_board(config: &ShiftcalConfig, month: YearMonth) -> Result<ShiftBoard> {
    let store = FileStore::open(config.data_path())?;
    let settings = BoardSettings::from_config(config)?;
    Ok(ShiftBoard::open(Storage::new(store), settings, month)?)
}

fn resolve_month(month: Option<&str>) -> Result<YearMonth> {
    match month {
        Some(m) => Ok(m.parse()?),
        None => Ok(YearMonth::current()),
    }
}

fn month_of(date: &str) -> Result<YearMonth> {
    let day = parse_date(date)
        .ok_or_else(|| anyhow::anyhow!("Invalid date '{}'. Expected YYYY-MM-DD", date))?;
    Ok(YearMonth::of(day))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_month_and_all_conflict() {
        let parsed = Cli::try_parse_from(["shiftcal", "export", "csv", "--all", "--month", "2024-03"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn config_set_parses() {
        let cli = Cli::try_parse_from(["shiftcal", "config", "set", "timezone", "Europe/Berlin"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: Some(ConfigAction::Set { ref key, ref value })
            } if key == "timezone" && value == "Europe/Berlin"
        ));
    }
}
