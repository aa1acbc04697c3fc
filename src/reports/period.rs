//! Report periods
//!
//! A `Period` names a span of days. Weeks start on the configured weekday,
//! every other span is calendar-aligned.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::{BudgetError, BudgetResult};

/// A span of days a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day(NaiveDate),
    /// The week containing the date
    Week(NaiveDate),
    Month(i32, u32),
    Year(i32),
    /// Inclusive on both ends
    Custom(NaiveDate, NaiveDate),
    All,
}

impl Period {
    /// Inclusive date bounds, `None` for `All`
    pub fn bounds(&self, week_start: Weekday) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            Period::Day(date) => Some((date, date)),
            Period::Week(date) => {
                let offset = (7 + date.weekday().num_days_from_monday()
                    - week_start.num_days_from_monday())
                    % 7;
                let start = date - Duration::days(offset as i64);
                Some((start, start + Duration::days(6)))
            }
            Period::Month(year, month) => {
                let start = NaiveDate::from_ymd_opt(year, month, 1)?;
                let next = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1)?
                };
                Some((start, next - Duration::days(1)))
            }
            Period::Year(year) => Some((
                NaiveDate::from_ymd_opt(year, 1, 1)?,
                NaiveDate::from_ymd_opt(year, 12, 31)?,
            )),
            Period::Custom(start, end) => Some((start, end)),
            Period::All => None,
        }
    }

    /// Whether `date` falls in the period; an unrepresentable month or
    /// year contains nothing
    pub fn contains(&self, date: NaiveDate, week_start: Weekday) -> bool {
        if *self == Period::All {
            return true;
        }
        self.bounds(week_start)
            .is_some_and(|(start, end)| date >= start && date <= end)
    }

    /// The period right after this one; `Custom` shifts by its own length
    pub fn next(&self) -> Period {
        self.shift(1)
    }

    pub fn prev(&self) -> Period {
        self.shift(-1)
    }

    fn shift(&self, steps: i32) -> Period {
        match *self {
            Period::Day(date) => Period::Day(date + Duration::days(steps as i64)),
            Period::Week(date) => Period::Week(date + Duration::weeks(steps as i64)),
            Period::Month(year, month) => {
                let index = year * 12 + month as i32 - 1 + steps;
                Period::Month(index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
            }
            Period::Year(year) => Period::Year(year + steps),
            Period::Custom(start, end) => {
                let length = (end - start).num_days() + 1;
                let delta = Duration::days(length * steps as i64);
                Period::Custom(start + delta, end + delta)
            }
            Period::All => Period::All,
        }
    }

    /// Parse a period name relative to `today`
    ///
    /// Accepts `today`, `week`, `month`, `year`, `all`, `last-week`,
    /// `last-month`, `last-year`, `YYYY`, `YYYY-MM`, `YYYY-MM-DD` and
    /// `YYYY-MM-DD..YYYY-MM-DD`.
    pub fn parse(s: &str, today: NaiveDate) -> BudgetResult<Period> {
        let s = s.trim().to_lowercase();
        let period = match s.as_str() {
            "today" | "day" => Period::Day(today),
            "week" | "this-week" => Period::Week(today),
            "month" | "this-month" => Period::Month(today.year(), today.month()),
            "year" | "this-year" => Period::Year(today.year()),
            "all" => Period::All,
            "yesterday" => Period::Day(today - Duration::days(1)),
            "last-week" => Period::Week(today).prev(),
            "last-month" => Period::Month(today.year(), today.month()).prev(),
            "last-year" => Period::Year(today.year() - 1),
            _ => return Self::parse_explicit(&s),
        };
        Ok(period)
    }

    fn parse_explicit(s: &str) -> BudgetResult<Period> {
        let invalid = || BudgetError::Validation(format!("Invalid period: '{}'", s));

        if let Some((start, end)) = s.split_once("..") {
            let start = NaiveDate::parse_from_str(start.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
            let end = NaiveDate::parse_from_str(end.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
            if end < start {
                return Err(BudgetError::Validation(format!(
                    "Period end {} is before start {}",
                    end, start
                )));
            }
            return Ok(Period::Custom(start, end));
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Period::Day(date));
        }

        match s.split('-').collect::<Vec<_>>().as_slice() {
            [year] if year.len() == 4 => year.parse().map(Period::Year).map_err(|_| invalid()),
            [year, month] if year.len() == 4 => {
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                if !(1..=12).contains(&month) {
                    return Err(invalid());
                }
                Ok(Period::Month(year, month))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day(date) => write!(f, "{}", date),
            Period::Week(date) => write!(f, "week of {}", date),
            Period::Month(year, month) => write!(f, "{:04}-{:02}", year, month),
            Period::Year(year) => write!(f, "{}", year),
            Period::Custom(start, end) => write!(f, "{}..{}", start, end),
            Period::All => write!(f, "all time"),
        }
    }
}
