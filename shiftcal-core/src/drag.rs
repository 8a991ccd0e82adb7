//! Drag-and-drop payload.
//!
//! A dragged template travels as a JSON string under the
//! [`DRAG_PAYLOAD_MIME`](crate::constants::DRAG_PAYLOAD_MIME) type. The
//! transport itself belongs to the UI layer; only the encoded snapshot is
//! handled here.

use serde::{Deserialize, Serialize};

use crate::error::{ShiftError, ShiftResult};
use crate::schedule::Assignment;
use crate::shift_type::ShiftType;

/// The template snapshot carried by a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    pub label: String,
    pub color: String,
    pub start_time: String,
    pub end_time: String,
}

impl DragPayload {
    pub fn encode(&self) -> ShiftResult<String> {
        serde_json::to_string(self).map_err(|e| ShiftError::Serialization(e.to_string()))
    }

    /// Decode a dropped payload. Anything that is not a complete snapshot is
    /// rejected.
    pub fn decode(raw: &str) -> ShiftResult<Self> {
        let payload: DragPayload = serde_json::from_str(raw)
            .map_err(|e| ShiftError::MalformedDragPayload(e.to_string()))?;

        if payload.label.is_empty() || payload.start_time.is_empty() || payload.end_time.is_empty()
        {
            return Err(ShiftError::MalformedDragPayload(
                "payload is missing label or times".into(),
            ));
        }
        Ok(payload)
    }
}

impl From<&ShiftType> for DragPayload {
    fn from(shift_type: &ShiftType) -> Self {
        DragPayload {
            label: shift_type.label.clone(),
            color: shift_type.color.clone(),
            start_time: shift_type.start_time.clone(),
            end_time: shift_type.end_time.clone(),
        }
    }
}

impl From<DragPayload> for Assignment {
    fn from(payload: DragPayload) -> Self {
        Assignment {
            label: payload.label,
            color: payload.color,
            start_time: payload.start_time,
            end_time: payload.end_time,
        }
    }
}
