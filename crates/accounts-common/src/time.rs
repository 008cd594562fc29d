//! Timestamp display helpers

use chrono::{DateTime, Utc};

/// Layout used for every timestamp rendered in API payloads.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a UTC timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_display(ts: &DateTime<Utc>) -> String {
    ts.format(DISPLAY_FORMAT).to_string()
}
