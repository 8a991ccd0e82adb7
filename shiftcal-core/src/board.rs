//! The shift board: one owner for all scheduling state.
//!
//! `ShiftBoard` holds the registry, the visible month, the selection and the
//! export settings, and exposes every user action as a plain method. UI layers
//! call these methods and supply a [`Dialogs`] implementation for the
//! confirmations and alerts the actions need.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use crate::calendar_grid::CalendarGrid;
use crate::config::{OverwritePolicy, ShiftcalConfig};
use crate::drag::DragPayload;
use crate::error::{ShiftError, ShiftResult};
use crate::export::{self, ExportFile, ExportFormat, ExportOptions, ExportScope};
use crate::month::YearMonth;
use crate::registry::ShiftTypeRegistry;
use crate::schedule::{self, Assignment, MonthSchedule};
use crate::selection::{DayTarget, Region, Selection};
use crate::shift_type::{ShiftType, ShiftTypePatch};
use crate::storage::Storage;

const DROP_FAILED_MESSAGE: &str = "An error occurred while placing the dropped shift.";
const CLEAR_ALL_PROMPT: &str = "Are you sure you want to clear ALL scheduled shifts and ALL custom shift types?\nThis action cannot be undone!";
const CLEAR_ALL_DONE: &str = "All schedule data and custom shift types have been cleared.";

/// Confirmation and notification hooks supplied by the UI.
pub trait Dialogs {
    /// Ask a yes/no question. Destructive actions only proceed on `true`.
    fn confirm(&mut self, message: &str) -> bool;
    fn alert(&mut self, message: &str);
}

/// Behaviour knobs read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSettings {
    pub overwrite_policy: OverwritePolicy,
    pub export_scope: ExportScope,
    pub timezone: Tz,
}

impl Default for BoardSettings {
    fn default() -> Self {
        BoardSettings {
            overwrite_policy: OverwritePolicy::default(),
            export_scope: ExportScope::default(),
            timezone: Tz::UTC,
        }
    }
}

impl BoardSettings {
    pub fn from_config(config: &ShiftcalConfig) -> ShiftResult<Self> {
        Ok(BoardSettings {
            overwrite_policy: config.overwrite_policy,
            export_scope: config.export_scope(),
            timezone: config.tz()?,
        })
    }
}

pub struct ShiftBoard {
    storage: Storage,
    registry: ShiftTypeRegistry,
    schedule: MonthSchedule,
    selection: Selection,
    settings: BoardSettings,
}

impl ShiftBoard {
    /// Load shift types and the schedule of `month`.
    pub fn open(storage: Storage, settings: BoardSettings, month: YearMonth) -> ShiftResult<Self> {
        let registry = ShiftTypeRegistry::load(&storage)?;
        let schedule = MonthSchedule::load(&storage, month)?;

        Ok(ShiftBoard {
            storage,
            registry,
            schedule,
            selection: Selection::Idle,
            settings,
        })
    }

    pub fn shift_types(&self) -> &[ShiftType] {
        self.registry.list()
    }

    pub fn schedule(&self) -> &MonthSchedule {
        &self.schedule
    }

    pub fn month(&self) -> YearMonth {
        self.schedule.month()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    pub fn grid(&self) -> CalendarGrid {
        CalendarGrid::build(&self.schedule)
    }

    // MONTH NAVIGATION:

    /// Switch the visible month. The previous month stays in storage.
    pub fn show_month(&mut self, month: YearMonth) -> ShiftResult<()> {
        self.schedule = MonthSchedule::load(&self.storage, month)?;
        Ok(())
    }

    // SHIFT TYPES:

    pub fn add_shift_type(&mut self, shift_type: ShiftType) -> ShiftResult<()> {
        self.registry.add(&mut self.storage, shift_type)
    }

    /// Edit a shift type. An armed selection of it picks up the new values;
    /// shifts already on the calendar keep the old ones.
    pub fn update_shift_type(&mut self, label: &str, patch: ShiftTypePatch) -> ShiftResult<ShiftType> {
        let updated = self.registry.update(&mut self.storage, label, patch)?;
        self.selection.refresh(&updated);
        Ok(updated)
    }

    /// Delete a shift type after confirmation. Returns false if the user
    /// declined.
    pub fn delete_shift_type(&mut self, label: &str, dialogs: &mut dyn Dialogs) -> ShiftResult<bool> {
        if self.registry.get(label).is_none() {
            return Err(ShiftError::NotFound(label.to_string()));
        }

        let prompt = format!(
            "Are you sure you want to delete the shift type \"{label}\"? Shifts already placed on the calendar will not be changed."
        );
        if !dialogs.confirm(&prompt) {
            return Ok(false);
        }

        self.registry.delete(&mut self.storage, label)?;
        self.selection.forget(label);
        Ok(true)
    }

    // SELECTION + PLACEMENT:

    pub fn click_template(&mut self, label: &str) -> ShiftResult<()> {
        let shift_type = self.lookup(label)?.clone();
        self.selection.click_template(&shift_type);
        Ok(())
    }

    /// Start dragging a template: disarms any selection and returns the
    /// payload the drag carries.
    pub fn begin_drag(&mut self, label: &str) -> ShiftResult<String> {
        let payload = DragPayload::from(self.lookup(label)?);
        self.selection.begin_drag();
        payload.encode()
    }

    pub fn click_region(&mut self, region: Region) {
        self.selection.click_region(region);
    }

    /// A click inside the day cell of `date`. Places the selected template
    /// when one is armed and the click did not hit a placed shift.
    /// Returns whether a shift was placed.
    pub fn click_day(
        &mut self,
        date: &str,
        target: DayTarget,
        dialogs: &mut dyn Dialogs,
    ) -> ShiftResult<bool> {
        match self.selection.placement_for(target) {
            Some(assignment) => self.place(date, assignment, dialogs),
            None => Ok(false),
        }
    }

    /// A template dropped on the day cell of `date`. A payload that cannot
    /// be decoded is reported once and nothing is placed.
    pub fn drop_on_day(
        &mut self,
        date: &str,
        payload: &str,
        dialogs: &mut dyn Dialogs,
    ) -> ShiftResult<bool> {
        let payload = match DragPayload::decode(payload) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("{e}");
                dialogs.alert(DROP_FAILED_MESSAGE);
                return Ok(false);
            }
        };

        self.place(date, Assignment::from(payload), dialogs)
    }

    /// A click on the shift placed on `date`: removes it after confirmation.
    /// Returns whether it was removed.
    pub fn click_placed_shift(&mut self, date: &str, dialogs: &mut dyn Dialogs) -> ShiftResult<bool> {
        let Some(existing) = self.schedule.get(date) else {
            return Ok(false);
        };

        let prompt = format!("Remove {} shift on {date}?", existing.label);
        if !dialogs.confirm(&prompt) {
            return Ok(false);
        }

        Ok(self.schedule.remove(&mut self.storage, date)?.is_some())
    }

    fn place(
        &mut self,
        date: &str,
        assignment: Assignment,
        dialogs: &mut dyn Dialogs,
    ) -> ShiftResult<bool> {
        if let Some(existing) = self.schedule.get(date) {
            if existing != &assignment && self.settings.overwrite_policy == OverwritePolicy::Confirm {
                let prompt = format!(
                    "Replace {} shift on {date} with {}?",
                    existing.label, assignment.label
                );
                if !dialogs.confirm(&prompt) {
                    debug!(date = %date, "Kept existing shift");
                    return Ok(false);
                }
            }
        }

        debug!(date = %date, label = %assignment.label, "Placing shift");
        self.schedule.place(&mut self.storage, date, assignment)?;
        Ok(true)
    }

    // EXPORT:

    pub fn toggle_export_scope(&mut self) -> ExportScope {
        self.settings.export_scope = self.settings.export_scope.toggled();
        info!(scope = ?self.settings.export_scope, "Export scope toggled");
        self.settings.export_scope
    }

    /// Export the shifts in the current scope. When there is nothing to
    /// export the user is alerted and no file is returned.
    pub fn export(
        &self,
        format: ExportFormat,
        now: DateTime<Utc>,
        dialogs: &mut dyn Dialogs,
    ) -> ShiftResult<Option<ExportFile>> {
        let entries = match self.settings.export_scope {
            ExportScope::CurrentMonth => self.schedule.entries().clone(),
            ExportScope::AllMonths => schedule::export_all(&self.storage)?,
        };

        let options = ExportOptions {
            format,
            scope: self.settings.export_scope,
            timezone: self.settings.timezone,
        };

        match export::export(&entries, options, self.month(), now) {
            Ok(file) => Ok(Some(file)),
            Err(e @ ShiftError::EmptyExport(_)) => {
                dialogs.alert(&e.to_string());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    // BULK CLEAR:

    /// Wipe every stored schedule and custom shift type after confirmation.
    pub fn clear_all_data(&mut self, dialogs: &mut dyn Dialogs) -> ShiftResult<bool> {
        if !dialogs.confirm(CLEAR_ALL_PROMPT) {
            return Ok(false);
        }

        let removed = self.storage.clear_all()?;
        info!(keys = removed, "Cleared all data");

        self.registry.reset_to_defaults();
        self.schedule.clear();
        self.selection.clear();

        dialogs.alert(CLEAR_ALL_DONE);
        Ok(true)
    }

    fn lookup(&self, label: &str) -> ShiftResult<&ShiftType> {
        self.registry
            .get(label)
            .ok_or_else(|| ShiftError::NotFound(label.to_string()))
    }
}
