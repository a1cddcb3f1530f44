//! Store-boundary timestamp codec.
//!
//! Item records carry their next availability as local wall-clock text in
//! the form `YYYY-MM-DD HH:MM:SS` with no timezone. Every value kartei
//! writes uses exactly that pattern.

use chrono::{Local, NaiveDateTime, Timelike};

/// Canonical timestamp pattern used by the item store.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Older records may use an ISO `T` separator or carry fractional seconds.
const LENIENT_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Format a timestamp in the canonical store pattern.
pub fn format(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a store timestamp.
///
/// Returns `None` when the text matches none of the accepted patterns.
pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| {
            LENIENT_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        })
}

/// Current local wall-clock time truncated to whole seconds.
pub fn local_now() -> NaiveDateTime {
    truncate_to_seconds(Local::now().naive_local())
}

/// Drop sub-second precision, which the store format cannot represent.
pub fn truncate_to_seconds(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0).unwrap_or(ts)
}
