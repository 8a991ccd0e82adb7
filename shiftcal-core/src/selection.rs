//! Click-to-place selection state.
//!
//! A template is "armed" by clicking it; each click on a day cell then places
//! a copy of it. Starting a drag disarms, since dragging is its own placement
//! path.

use tracing::debug;

use crate::schedule::Assignment;
use crate::shift_type::ShiftType;

/// Parts of the screen a click can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    TemplateList,
    CalendarGrid,
    Controls,
    Modal,
    /// Anywhere else
    Outside,
}

/// What a click inside a day cell hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayTarget {
    /// The cell background or day number
    Cell,
    /// A shift already placed in the cell
    PlacedShift,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Selected(ShiftType),
}

impl Selection {
    pub fn selected(&self) -> Option<&ShiftType> {
        match self {
            Selection::Idle => None,
            Selection::Selected(shift_type) => Some(shift_type),
        }
    }

    pub fn is_selected(&self, label: &str) -> bool {
        self.selected().is_some_and(|t| t.label == label)
    }

    /// Clicking a template toggles it, or switches to it from another one.
    pub fn click_template(&mut self, shift_type: &ShiftType) {
        if self.is_selected(&shift_type.label) {
            debug!(label = %shift_type.label, "Deselected template");
            *self = Selection::Idle;
        } else {
            debug!(label = %shift_type.label, "Selected template");
            *self = Selection::Selected(shift_type.clone());
        }
    }

    pub fn begin_drag(&mut self) {
        self.clear();
    }

    pub fn click_region(&mut self, region: Region) {
        if region == Region::Outside {
            self.clear();
        }
    }

    /// The assignment a click on a day cell should place. Clicks on an
    /// already placed shift never place.
    pub fn placement_for(&self, target: DayTarget) -> Option<Assignment> {
        match (self, target) {
            (Selection::Selected(shift_type), DayTarget::Cell) => {
                Some(Assignment::from(shift_type))
            }
            _ => None,
        }
    }

    /// Replace the armed snapshot after its template was edited.
    pub fn refresh(&mut self, updated: &ShiftType) {
        if self.is_selected(&updated.label) {
            *self = Selection::Selected(updated.clone());
        }
    }

    /// Disarm if `label` is the armed template.
    pub fn forget(&mut self, label: &str) {
        if self.is_selected(label) {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        if let Selection::Selected(shift_type) = self {
            debug!(label = %shift_type.label, "Cleared selection");
        }
        *self = Selection::Idle;
    }
}
