//! Utility functions for date formatting, log previews, and JSON error classification.

use chrono::{NaiveDate, Utc};

/// Format a date the way article cards show it: `YYYY.MM.DD`.
pub fn dotted_date(date: NaiveDate) -> String {
    date.format("%Y.%m.%d").to_string()
}

/// Today's UTC date as `YYYY.MM.DD`.
pub fn today_dotted() -> String {
    dotted_date(Utc::now().date_naive())
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended. Counts characters, not bytes, so Japanese
/// replies never get split inside a code point.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Detect if a serde_json error indicates truncated/incomplete JSON.
///
/// When the model's reply is cut off (token limits, dropped connection) the
/// parse fails with an EOF error rather than a syntax error.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}
