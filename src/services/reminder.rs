//! Task reminder scheduling
//!
//! Works out when reminders fire and which ones fall inside a window. It does
//! not deliver anything; a front end polls `due` or hands `schedule` to the
//! platform's notifier.

use chrono::NaiveDateTime;

use crate::models::{ReminderOffset, Task, TaskId};

/// A reminder ready to be handed to a notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledReminder {
    /// Stable per task, so re-scheduling replaces the earlier notification
    pub notification_id: u32,
    pub task_id: TaskId,
    pub title: String,
    pub fire_at: NaiveDateTime,
    pub task_start: NaiveDateTime,
    pub offset: ReminderOffset,
}

impl ScheduledReminder {
    fn for_task(task: &Task) -> Option<Self> {
        let fire_at = task.reminder_time()?;
        Some(Self {
            notification_id: notification_id(task.id),
            task_id: task.id,
            title: task.title.clone(),
            fire_at,
            task_start: task.start,
            offset: task.reminder,
        })
    }
}

/// Notification id derived from the first four bytes of the task UUID
pub fn notification_id(task_id: TaskId) -> u32 {
    let bytes = task_id.as_uuid().as_bytes();
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Computes reminder times for tasks
#[derive(Debug, Default, Clone, Copy)]
pub struct ReminderScheduler;

impl ReminderScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Upcoming reminders for pending tasks, earliest first
    ///
    /// Reminders whose time is already before `now` are skipped; one firing
    /// exactly at `now` is kept.
    pub fn schedule<'t, I>(&self, tasks: I, now: NaiveDateTime) -> Vec<ScheduledReminder>
    where
        I: IntoIterator<Item = &'t Task>,
    {
        let mut reminders: Vec<_> = tasks
            .into_iter()
            .filter(|t| !t.completed)
            .filter_map(ScheduledReminder::for_task)
            .filter(|r| r.fire_at >= now)
            .collect();
        reminders.sort_by(|a, b| a.fire_at.cmp(&b.fire_at).then(a.title.cmp(&b.title)));
        reminders
    }

    /// Reminders firing after `since` and up to and including `until`
    pub fn due<'t, I>(&self, tasks: I, since: NaiveDateTime, until: NaiveDateTime) -> Vec<ScheduledReminder>
    where
        I: IntoIterator<Item = &'t Task>,
    {
        let mut reminders: Vec<_> = tasks
            .into_iter()
            .filter(|t| !t.completed)
            .filter_map(ScheduledReminder::for_task)
            .filter(|r| r.fire_at > since && r.fire_at <= until)
            .collect();
        reminders.sort_by(|a, b| a.fire_at.cmp(&b.fire_at).then(a.title.cmp(&b.title)));
        reminders
    }
}
