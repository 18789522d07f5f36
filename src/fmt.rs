//! Formatting helpers for table cells and headers.
//!
//! Pure functions only, no ratatui styles, so the layout can measure text
//! without a terminal.

use std::time::Duration;

use unicode_width::UnicodeWidthStr;

use crate::storage::Sample;

/// Placeholder shown for a missing sample.
pub const MISSING_GLYPH: &str = ".";

/// Header of the newest value column.
pub const CURRENT_HEADER: &str = "Curr";

/// Formats a number with two decimals, then strips trailing zeros and a
/// trailing point.
///
/// `4.00` -> `"4"`, `4.50` -> `"4.5"`, `-0.001` -> `"0"`.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let mut s = format!("{:.2}", value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Formats a projected sample: missing samples become [`MISSING_GLYPH`].
pub fn format_sample(sample: Sample) -> String {
    match sample {
        Some(v) => format_value(v),
        None => MISSING_GLYPH.to_string(),
    }
}

/// Header for a value column `offset` polls behind the newest one.
///
/// Offset 0 is [`CURRENT_HEADER`]; others are `-{age}s`, e.g. `-10s` or
/// `-1.5s` for sub-second intervals.
pub fn column_header(offset: usize, interval: Duration) -> String {
    if offset == 0 {
        return CURRENT_HEADER.to_string();
    }
    let age = interval.as_secs_f64() * offset as f64;
    format!("-{}s", format_value(age))
}

/// Width of `s` in terminal columns.
pub fn display_width(s: &str) -> u16 {
    u16::try_from(UnicodeWidthStr::width(s)).unwrap_or(u16::MAX)
}

/// Formats a duration for the header bar: `5s`, `1.5s`, `2m`, `250ms`.
pub fn format_interval(interval: Duration) -> String {
    let ms = interval.as_millis();
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms % 60_000 == 0 {
        format!("{}m", ms / 60_000)
    } else {
        format!("{}s", format_value(interval.as_secs_f64()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value_strips_zeros() {
        assert_eq!(format_value(4.0), "4");
        assert_eq!(format_value(4.5), "4.5");
        assert_eq!(format_value(4.25), "4.25");
        assert_eq!(format_value(4.257), "4.26");
        assert_eq!(format_value(100.0), "100");
        assert_eq!(format_value(190.0), "190");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(-3.0), "-3");
        assert_eq!(format_value(-0.001), "0");
        assert_eq!(format_value(1e9), "1000000000");
    }

    #[test]
    fn test_format_value_special() {
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_format_sample_missing() {
        assert_eq!(format_sample(None), MISSING_GLYPH);
        assert_eq!(format_sample(Some(0.0)), "0");
    }

    #[test]
    fn test_column_header() {
        let five = Duration::from_secs(5);
        assert_eq!(column_header(0, five), "Curr");
        assert_eq!(column_header(1, five), "-5s");
        assert_eq!(column_header(3, five), "-15s");
        assert_eq!(column_header(3, Duration::from_millis(500)), "-1.5s");
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width(""), 0);
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(Duration::from_secs(5)), "5s");
        assert_eq!(format_interval(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_interval(Duration::from_millis(250)), "250ms");
        assert_eq!(format_interval(Duration::from_secs(120)), "2m");
    }
}
