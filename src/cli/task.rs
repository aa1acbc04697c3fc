//! Task and reminder CLI commands

use chrono::{Duration, Local, NaiveDateTime};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format::format_datetime;
use crate::display::{format_reminder_list, format_task_details, format_task_list};
use crate::error::BudgetResult;
use crate::models::ReminderOffset;
use crate::services::{CreateTaskInput, ReminderScheduler, TaskFilter, TaskService, UpdateTaskInput};
use crate::storage::Storage;

use super::args::{parse_datetime, require_changes};

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task
    Add {
        title: String,
        /// Start (YYYY-MM-DD HH:MM)
        #[arg(short, long, value_parser = parse_datetime)]
        start: NaiveDateTime,
        /// End (default: same as start)
        #[arg(short, long, value_parser = parse_datetime)]
        end: Option<NaiveDateTime>,
        #[arg(short, long)]
        description: Option<String>,
        /// Reminder lead time: none, 0m, 5m, 15m, 30m, 1h, 1d
        #[arg(short, long)]
        reminder: Option<ReminderOffset>,
    },

    /// List tasks by start time
    List {
        /// Show completed tasks instead of pending ones
        #[arg(short, long)]
        completed: bool,
        /// Show every task
        #[arg(short, long, conflicts_with = "completed")]
        all: bool,
    },

    Show { id: String },

    /// Edit a task
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        /// New start; the task keeps its length unless --end is given
        #[arg(short, long, value_parser = parse_datetime)]
        start: Option<NaiveDateTime>,
        #[arg(short, long, value_parser = parse_datetime)]
        end: Option<NaiveDateTime>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
        #[arg(short, long)]
        reminder: Option<ReminderOffset>,
    },

    /// Mark a task as completed
    Done { id: String },

    /// Mark a completed task as pending again
    Reopen { id: String },

    Delete { id: String },

    /// Upcoming reminders for pending tasks
    Reminders,

    /// Reminders that fired within the last N minutes
    Due {
        #[arg(short, long, default_value = "60")]
        minutes: i64,
    },
}

/// Handle a task command
pub fn handle_task_command(storage: &Storage, settings: &Settings, cmd: TaskCommands) -> BudgetResult<()> {
    let service = TaskService::new(storage).with_default_reminder(settings.default_reminder);
    let now = Local::now().naive_local();

    match cmd {
        TaskCommands::Add {
            title,
            start,
            end,
            description,
            reminder,
        } => {
            let task = service.create(CreateTaskInput {
                title,
                description,
                start,
                end,
                reminder,
            })?;
            println!("Added task {}: {}", task.id, task);
            if let Some(at) = task.reminder_time() {
                println!("Reminder at {}", format_datetime(at, &settings.date_format));
            }
        }

        TaskCommands::List { completed, all } => {
            let filter = if all {
                TaskFilter::All
            } else if completed {
                TaskFilter::Completed
            } else {
                TaskFilter::Pending
            };
            print!("{}", format_task_list(&service.list(filter)?, &settings.date_format));
        }

        TaskCommands::Show { id } => {
            print!("{}", format_task_details(&service.find(&id)?, &settings.date_format));
        }

        TaskCommands::Edit {
            id,
            title,
            start,
            end,
            description,
            clear_description,
            reminder,
        } => {
            let task = service.find(&id)?;
            let description = if clear_description {
                Some(None)
            } else {
                description.map(Some)
            };
            require_changes(
                title.is_some()
                    || start.is_some()
                    || end.is_some()
                    || description.is_some()
                    || reminder.is_some(),
                "--title, --start, --end, --description or --reminder",
            )?;

            let updated = service.update(
                task.id,
                UpdateTaskInput {
                    title,
                    description,
                    start,
                    end,
                    reminder,
                },
            )?;
            print!("{}", format_task_details(&updated, &settings.date_format));
        }

        TaskCommands::Done { id } => {
            let task = service.find(&id)?;
            let task = service.set_completed(task.id, true)?;
            println!("Completed: {}", task.title);
        }

        TaskCommands::Reopen { id } => {
            let task = service.find(&id)?;
            let task = service.set_completed(task.id, false)?;
            println!("Reopened: {}", task.title);
        }

        TaskCommands::Delete { id } => {
            let task = service.find(&id)?;
            let deleted = service.delete(task.id)?;
            println!("Deleted task {} ({})", deleted.id, deleted.title);
        }

        TaskCommands::Reminders => {
            let tasks = service.list(TaskFilter::Pending)?;
            let reminders = ReminderScheduler::new().schedule(&tasks, now);
            print!("{}", format_reminder_list(&reminders, &settings.date_format));
        }

        TaskCommands::Due { minutes } => {
            let tasks = service.list(TaskFilter::Pending)?;
            let since = now - Duration::minutes(minutes.max(0));
            let reminders = ReminderScheduler::new().due(&tasks, since, now);
            print!("{}", format_reminder_list(&reminders, &settings.date_format));
        }
    }

    Ok(())
}
