//! Shared formatting helpers for terminal output

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Date layout used when the configured one cannot render a date
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a date with a strftime pattern, falling back to ISO dates
///
/// Patterns with unknown specifiers or time fields fail to render a bare
/// date, so they fall back instead of aborting the output.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", date.format(pattern)) {
        Ok(()) => out,
        Err(_) => date.format(DEFAULT_DATE_FORMAT).to_string(),
    }
}

/// Format a timestamp as the configured date followed by `HH:MM`
pub fn format_datetime(at: NaiveDateTime, pattern: &str) -> String {
    format!("{} {}", format_date(at.date(), pattern), at.format("%H:%M"))
}

/// Render rows as a table in the shared style
pub fn render_table<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct > 0.0 && pct < 0.1 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// A fixed-width progress bar; values past `max_value` fill the bar
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Truncate to `max_len` characters with an ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_uses_pattern() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_date(date, "%d.%m.%Y"), "07.03.2025");
        assert_eq!(format_date(date, DEFAULT_DATE_FORMAT), "2025-03-07");

        let at = date.and_hms_opt(9, 5, 0).unwrap();
        assert_eq!(format_datetime(at, "%m/%d/%Y"), "03/07/2025 09:05");
    }

    #[test]
    fn test_format_date_falls_back_on_bad_pattern() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_date(date, "%Q"), "2025-03-07");
        assert_eq!(format_date(date, "%H:%M"), "2025-03-07");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.05), "0.05%");
        assert_eq!(format_percentage(5.5), "5.5%");
        assert_eq!(format_percentage(50.0), "50%");
    }

    #[test]
    fn test_format_bar() {
        let bar = format_bar(50.0, 100.0, 10);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 5);
        assert_eq!(format_bar(250.0, 100.0, 4), "████");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 5), "He...");
        assert_eq!(truncate("Hi", 5), "Hi");
        assert_eq!(truncate("Café au lait", 6), "Caf...");
    }
}
