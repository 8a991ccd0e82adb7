/// Key holding the JSON array of shift types.
pub const SHIFT_TYPES_KEY: &str = "shiftTypes";

/// Prefix of the per-month schedule keys (`scheduledShifts_YYYY-MM`).
pub const MONTH_KEY_PREFIX: &str = "scheduledShifts_";

/// MIME type the drag payload travels under.
pub const DRAG_PAYLOAD_MIME: &str = "application/json";

pub const ICAL_PRODID: &str = "-//shiftcal//Shift Export//EN";

/// Domain part of synthesized VEVENT UIDs.
pub const UID_DOMAIN: &str = "shiftcal";
