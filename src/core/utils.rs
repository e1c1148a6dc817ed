//! ### Shared helpers
//!

use std::io;

use chrono::{DateTime, Local};
use crossterm::execute;

use super::error::AppResult;

/// Decode raw command output.
///
/// UTF-8 is tried first; anything else goes through charset detection. Only
/// trailing whitespace is removed because leading indentation is significant
/// for the git text parsers.
pub fn auto_decode(input: &[u8]) -> AppResult<String> {
    let utf8_error = match String::from_utf8(input.to_vec()) {
        Ok(s) => return Ok(s.trim_end().to_string()),
        Err(e) => e,
    };

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(input, true);
    let encoding: &'static encoding_rs::Encoding = detector.guess(None, true);
    let (decoded, _, had_errors) = encoding.decode(input);

    if had_errors {
        return Err(utf8_error.into());
    }

    Ok(decoded.trim_end().to_string())
}

/// Format a unix timestamp (seconds, as AccuRev prints it) in local time.
/// Values that are not a timestamp are returned unchanged.
pub fn format_epoch(raw: &str) -> String {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Render an optional field for display.
pub fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

pub struct CursorGuard;

impl CursorGuard {
    pub fn new() -> Self {
        execute!(io::stdout(), crossterm::cursor::Hide).ok();
        execute!(io::stderr(), crossterm::cursor::Hide).ok();
        CursorGuard
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        execute!(io::stdout(), crossterm::cursor::Show).ok();
        execute!(io::stderr(), crossterm::cursor::Show).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_keeps_leading_indentation() {
        let out = auto_decode(b"  feature 1234567 msg\n* main abcdef0 msg\n\n").unwrap();
        assert_eq!(out, "  feature 1234567 msg\n* main abcdef0 msg");
    }

    #[test]
    fn decode_falls_back_for_legacy_encodings() {
        // "caf\xe9" is Latin-1 / windows-1252 for "café"
        let out = auto_decode(b"caf\xe9 au lait").unwrap();
        assert!(out.starts_with("caf"));
        assert!(out.ends_with("au lait"));
    }

    #[test]
    fn non_numeric_time_is_passed_through() {
        assert_eq!(format_epoch("yesterday"), "yesterday");
        assert_ne!(format_epoch("1415577600"), "1415577600");
    }
}
