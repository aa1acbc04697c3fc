//! Task and reminder display formatting

use tabled::Tabled;

use crate::models::Task;
use crate::services::ScheduledReminder;

use super::format::{format_datetime, render_table, truncate};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "")]
    done: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Reminder")]
    reminder: String,
}

#[derive(Tabled)]
struct ReminderRow {
    #[tabled(rename = "Fires")]
    fire_at: String,
    #[tabled(rename = "Task")]
    title: String,
    #[tabled(rename = "Starts")]
    task_start: String,
    #[tabled(rename = "Lead")]
    offset: String,
}

/// Format tasks as a table
pub fn format_task_list(tasks: &[Task], date_format: &str) -> String {
    if tasks.is_empty() {
        return "No tasks found.\n".to_string();
    }

    let rows = tasks.iter().map(|t| TaskRow {
        done: if t.completed { "✓" } else { " " },
        id: t.id.to_string(),
        start: format_datetime(t.start, date_format),
        end: if t.end.date() == t.start.date() {
            t.end.format("%H:%M").to_string()
        } else {
            format_datetime(t.end, date_format)
        },
        title: truncate(&t.title, 32),
        reminder: t.reminder.to_string(),
    });

    format!("{}\n", render_table(rows))
}

pub fn format_task_details(task: &Task, date_format: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Task:     {}\n", task.id));
    output.push_str(&format!("Title:    {}\n", task.title));
    if let Some(description) = &task.description {
        output.push_str(&format!("Details:  {}\n", description));
    }
    output.push_str(&format!("Start:    {}\n", format_datetime(task.start, date_format)));
    output.push_str(&format!("End:      {}\n", format_datetime(task.end, date_format)));
    match task.reminder_time() {
        Some(at) => output.push_str(&format!(
            "Reminder: {} ({} before)\n",
            format_datetime(at, date_format),
            task.reminder
        )),
        None => output.push_str("Reminder: none\n"),
    }
    output.push_str(&format!(
        "Status:   {}\n",
        if task.completed { "completed" } else { "pending" }
    ));

    output
}

/// Format scheduled reminders, earliest first
pub fn format_reminder_list(reminders: &[ScheduledReminder], date_format: &str) -> String {
    if reminders.is_empty() {
        return "No reminders scheduled.\n".to_string();
    }

    let rows = reminders.iter().map(|r| ReminderRow {
        fire_at: format_datetime(r.fire_at, date_format),
        title: truncate(&r.title, 32),
        task_start: format_datetime(r.task_start, date_format),
        offset: r.offset.to_string(),
    });

    format!("{}\n", render_table(rows))
}
