//! Task model
//!
//! A task spans a start and end time and may ask for a reminder some fixed
//! offset before it starts.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::TaskId;

/// How long before a task's start a reminder should fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReminderOffset {
    /// No reminder
    #[default]
    None,
    AtStart,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    OneDay,
}

impl ReminderOffset {
    /// Every selectable offset, in increasing lead time
    pub const ALL: [ReminderOffset; 7] = [
        Self::None,
        Self::AtStart,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::OneHour,
        Self::OneDay,
    ];

    /// Lead time before the task start, `None` when no reminder is wanted
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::None => None,
            Self::AtStart => Some(Duration::zero()),
            Self::FiveMinutes => Some(Duration::minutes(5)),
            Self::FifteenMinutes => Some(Duration::minutes(15)),
            Self::ThirtyMinutes => Some(Duration::minutes(30)),
            Self::OneHour => Some(Duration::hours(1)),
            Self::OneDay => Some(Duration::days(1)),
        }
    }

    /// Short label used on the command line
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::AtStart => "0m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1h",
            Self::OneDay => "1d",
        }
    }
}

impl fmt::Display for ReminderOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ReminderOffset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|o| o.label() == s)
            .or(match s.as_str() {
                "off" => Some(Self::None),
                "start" | "at_start" => Some(Self::AtStart),
                _ => None,
            })
            .ok_or_else(|| {
                format!(
                    "Unknown reminder '{}'. Use one of: none, 0m, 5m, 15m, 30m, 1h, 1d",
                    s
                )
            })
    }
}

/// A task with an optional reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Local wall-clock start
    pub start: NaiveDateTime,

    /// Local wall-clock end
    pub end: NaiveDateTime,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub reminder: ReminderOffset,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            title: title.into(),
            description: None,
            start,
            end,
            completed: false,
            reminder: ReminderOffset::None,
            created_at: now,
            updated_at: now,
        }
    }

    /// When the reminder for this task fires, if it has one
    pub fn reminder_time(&self) -> Option<NaiveDateTime> {
        self.reminder.duration().map(|lead| self.start - lead)
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
        self.updated_at = Utc::now();
    }

    /// Validate the task
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }

        if self.end < self.start {
            return Err(TaskValidationError::EndBeforeStart);
        }

        Ok(())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.start.format("%Y-%m-%d %H:%M"), self.title)
    }
}

/// Validation errors for tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    EndBeforeStart,
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Task title cannot be empty"),
            Self::EndBeforeStart => write!(f, "Task end time is before its start time"),
        }
    }
}

impl std::error::Error for TaskValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_reminder_time() {
        let mut task = Task::new("Pay rent", at(10, 0), at(11, 0));
        assert_eq!(task.reminder_time(), None);

        task.reminder = ReminderOffset::FifteenMinutes;
        assert_eq!(task.reminder_time(), Some(at(9, 45)));

        task.reminder = ReminderOffset::AtStart;
        assert_eq!(task.reminder_time(), Some(at(10, 0)));
    }

    #[test]
    fn test_reminder_parse() {
        assert_eq!("1h".parse::<ReminderOffset>().unwrap(), ReminderOffset::OneHour);
        assert_eq!("OFF".parse::<ReminderOffset>().unwrap(), ReminderOffset::None);
        assert_eq!("start".parse::<ReminderOffset>().unwrap(), ReminderOffset::AtStart);
        assert!("2h".parse::<ReminderOffset>().is_err());
    }

    #[test]
    fn test_reminder_serde_name() {
        let json = serde_json::to_string(&ReminderOffset::ThirtyMinutes).unwrap();
        assert_eq!(json, "\"thirty_minutes\"");
    }

    #[test]
    fn test_validation() {
        let task = Task::new("", at(10, 0), at(11, 0));
        assert_eq!(task.validate(), Err(TaskValidationError::EmptyTitle));

        let task = Task::new("Call bank", at(10, 0), at(9, 0));
        assert_eq!(task.validate(), Err(TaskValidationError::EndBeforeStart));

        let task = Task::new("Call bank", at(10, 0), at(10, 0));
        assert!(task.validate().is_ok());
    }
}
