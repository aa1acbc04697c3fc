//! Shared argument parsers for clap
//!
//! Dates are `YYYY-MM-DD`; `today` and `yesterday` are accepted too. Times
//! are local wall-clock `YYYY-MM-DD HH:MM` (or `T` as the separator).

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::settings::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::Money;
use crate::reports::Period;
use crate::services::TransactionFilter;

/// Parse a money amount such as `12.50` or `$12.50`
pub fn parse_money(s: &str) -> Result<Money, String> {
    Money::parse(s).map_err(|e| e.to_string())
}

/// Parse a calendar date
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let today = Local::now().date_naive();
    match s.trim().to_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => Ok(today - Duration::days(1)),
        "tomorrow" => Ok(today + Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", s)),
    }
}

/// Parse a local date and time; a bare date means midnight
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    let s = s.trim();
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    parse_date(s)
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| format!("Invalid date/time '{}', expected YYYY-MM-DD HH:MM", s))
}

/// Build a transaction filter from the common listing options
pub fn build_filter(
    settings: &Settings,
    category: Option<String>,
    period: Option<&str>,
    limit: Option<usize>,
) -> BudgetResult<TransactionFilter> {
    let mut filter = TransactionFilter::new();
    if let Some(category) = category {
        filter = filter.category(category);
    }
    if let Some(period) = period {
        let period = Period::parse(period, Local::now().date_naive())?;
        if let Some((start, end)) = period.bounds(settings.week_start()) {
            filter = filter.date_range(start, end);
        }
    }
    if let Some(limit) = limit {
        filter = filter.limit(limit);
    }
    Ok(filter)
}

/// Resolve a `--comment` / `--clear-comment` pair into an update value
pub fn comment_change(comment: Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        Some(None)
    } else {
        comment.map(Some)
    }
}

/// Fail when an edit command was given nothing to change
pub fn require_changes(any: bool, hint: &str) -> BudgetResult<()> {
    if any {
        Ok(())
    } else {
        Err(BudgetError::Validation(format!("No changes specified. Use {}.", hint)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-04").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
        );
        assert_eq!(parse_date("today").unwrap(), Local::now().date_naive());
        assert!(parse_date("03/04/2025").is_err());
    }

    #[test]
    fn test_parse_datetime() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("2025-03-04 09:30").unwrap(), expected);
        assert_eq!(parse_datetime("2025-03-04T09:30").unwrap(), expected);
        assert_eq!(
            parse_datetime("2025-03-04").unwrap(),
            expected.date().and_time(NaiveTime::MIN)
        );
        assert!(parse_datetime("9:30").is_err());
    }

    #[test]
    fn test_build_filter_with_period() {
        let filter = build_filter(&Settings::default(), Some("Food".into()), Some("2025-02"), Some(5)).unwrap();
        assert_eq!(filter.category.as_deref(), Some("Food"));
        assert_eq!(filter.start_date, NaiveDate::from_ymd_opt(2025, 2, 1));
        assert_eq!(filter.end_date, NaiveDate::from_ymd_opt(2025, 2, 28));
        assert_eq!(filter.limit, Some(5));

        let all = build_filter(&Settings::default(), None, Some("all"), None).unwrap();
        assert!(all.start_date.is_none());
    }

    #[test]
    fn test_comment_change() {
        assert_eq!(comment_change(None, false), None);
        assert_eq!(comment_change(Some("x".into()), false), Some(Some("x".into())));
        assert_eq!(comment_change(Some("x".into()), true), Some(None));
    }
}
