//! Shift type templates.

use serde::{Deserialize, Serialize};

use crate::error::{ShiftError, ShiftResult};

/// A reusable shift template (e.g. "Night, 20:00-04:00").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftType {
    pub label: String,
    /// Hex color, `#rrggbb`
    pub color: String,
    /// `HH:MM`, 24-hour
    pub start_time: String,
    /// `HH:MM`, 24-hour. Earlier than `start_time` for overnight shifts.
    pub end_time: String,
    /// Optional presentation hint carried along with the template
    #[serde(
        rename = "cssClass",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub style_tag: Option<String>,
}

/// Changes applied by an edit. The label is not part of it: shift types
/// cannot be renamed once created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftTypePatch {
    pub color: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl ShiftType {
    pub fn new(
        label: impl Into<String>,
        color: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        ShiftType {
            label: label.into(),
            color: color.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            style_tag: None,
        }
    }

    pub fn with_style_tag(mut self, tag: impl Into<String>) -> Self {
        self.style_tag = Some(tag.into());
        self
    }

    /// Check the required fields. The label is trimmed in place.
    pub fn validate(&mut self) -> ShiftResult<()> {
        self.label = self.label.trim().to_string();

        if self.label.is_empty() || self.start_time.is_empty() || self.end_time.is_empty() {
            return Err(ShiftError::Validation(
                "Please fill in Label, Start Time, and End Time.".into(),
            ));
        }
        Ok(())
    }

    /// Case-insensitive label identity.
    pub fn has_label(&self, label: &str) -> bool {
        self.label.to_lowercase() == label.to_lowercase()
    }

    pub fn apply(&mut self, patch: ShiftTypePatch) -> ShiftResult<()> {
        if patch.start_time.as_deref() == Some("") || patch.end_time.as_deref() == Some("") {
            return Err(ShiftError::Validation(
                "Start Time and End Time cannot be empty.".into(),
            ));
        }

        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(start) = patch.start_time {
            self.start_time = start;
        }
        if let Some(end) = patch.end_time {
            self.end_time = end;
        }
        Ok(())
    }

    /// True when the shift ends on the following day. Both times are
    /// zero-padded 24-hour strings, so string order is time order.
    pub fn crosses_midnight(&self) -> bool {
        self.end_time < self.start_time
    }

    /// `"Label (HH:MM-HH:MM)"`, as shown on templates and calendar cells.
    pub fn display_label(&self) -> String {
        format!("{} ({}-{})", self.label, self.start_time, self.end_time)
    }
}

/// Templates a fresh installation starts with.
pub fn default_shift_types() -> Vec<ShiftType> {
    vec![
        ShiftType::new("Day", "#add8e6", "08:00", "16:00").with_style_tag("shift-day"),
        ShiftType::new("Night", "#4682b4", "20:00", "04:00").with_style_tag("shift-night"),
        ShiftType::new("Back", "#90ee90", "12:00", "20:00").with_style_tag("shift-back"),
    ]
}

/// Parse `#rrggbb` into its channels.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Whether a background color is light enough to need dark text.
/// Unparseable colors count as light.
pub fn is_color_light(color: &str) -> bool {
    match parse_hex_color(color) {
        Some((r, g, b)) => {
            let luminance = (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) / 255.0;
            luminance > 0.6
        }
        None => true,
    }
}

/// Text color to draw on top of `background`.
pub fn text_color_for(background: &str) -> &'static str {
    if is_color_light(background) {
        "#333"
    } else {
        "#fff"
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
