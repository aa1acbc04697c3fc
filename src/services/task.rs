//! Task service

use chrono::NaiveDateTime;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::transaction::normalize_comment;
use crate::models::{ReminderOffset, Task, TaskId};
use crate::storage::{Storage, StoreKey};

/// Which tasks a listing includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    Pending,
    Completed,
    All,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::Pending => !task.completed,
            Self::Completed => task.completed,
            Self::All => true,
        }
    }
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    /// Defaults to `start`
    pub end: Option<NaiveDateTime>,
    /// Defaults to the service's default reminder
    pub reminder: Option<ReminderOffset>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub reminder: Option<ReminderOffset>,
}

/// Service for task management
pub struct TaskService<'a> {
    storage: &'a Storage,
    default_reminder: ReminderOffset,
}

impl<'a> TaskService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            default_reminder: ReminderOffset::None,
        }
    }

    /// Reminder used when a new task does not ask for one
    pub fn with_default_reminder(mut self, reminder: ReminderOffset) -> Self {
        self.default_reminder = reminder;
        self
    }

    pub fn create(&self, input: CreateTaskInput) -> BudgetResult<Task> {
        let end = input.end.unwrap_or(input.start);
        let mut task = Task::new(input.title.trim(), input.start, end);
        task.description = normalize_comment(input.description);
        task.reminder = input.reminder.unwrap_or(self.default_reminder);

        task.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage.tasks.upsert(task.clone())?;
        self.storage.save(StoreKey::Tasks)?;

        self.storage.log_create(
            EntityType::Task,
            task.id.to_string(),
            Some(task.title.clone()),
            &task,
        )?;
        info!(id = %task.id, start = %task.start, reminder = %task.reminder, "task created");

        Ok(task)
    }

    pub fn get(&self, id: TaskId) -> BudgetResult<Option<Task>> {
        self.storage.tasks.get(id)
    }

    pub fn find(&self, identifier: &str) -> BudgetResult<Task> {
        self.storage
            .tasks
            .find(identifier)?
            .ok_or_else(|| BudgetError::task_not_found(identifier))
    }

    /// Tasks passing the filter, earliest start first
    pub fn list(&self, filter: TaskFilter) -> BudgetResult<Vec<Task>> {
        self.storage.tasks.filter(|t| filter.matches(t))
    }

    pub fn update(&self, id: TaskId, input: UpdateTaskInput) -> BudgetResult<Task> {
        let before = self
            .get(id)?
            .ok_or_else(|| BudgetError::task_not_found(id.to_string()))?;
        let mut task = before.clone();

        if let Some(title) = input.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = input.description {
            task.description = normalize_comment(description);
        }
        if let Some(start) = input.start {
            // Moving the start keeps the task's length unless a new end is given
            let length = task.end - task.start;
            task.start = start;
            task.end = start + length;
        }
        if let Some(end) = input.end {
            task.end = end;
        }
        if let Some(reminder) = input.reminder {
            task.reminder = reminder;
        }

        task.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        task.updated_at = chrono::Utc::now();

        self.save_update(&before, &task)?;
        Ok(task)
    }

    /// Mark a task done or not done
    pub fn set_completed(&self, id: TaskId, completed: bool) -> BudgetResult<Task> {
        let before = self
            .get(id)?
            .ok_or_else(|| BudgetError::task_not_found(id.to_string()))?;
        if before.completed == completed {
            return Ok(before);
        }

        let mut task = before.clone();
        task.set_completed(completed);

        self.save_update(&before, &task)?;
        Ok(task)
    }

    pub fn delete(&self, id: TaskId) -> BudgetResult<Task> {
        let task = self
            .storage
            .tasks
            .delete(id)?
            .ok_or_else(|| BudgetError::task_not_found(id.to_string()))?;
        self.storage.save(StoreKey::Tasks)?;

        self.storage.log_delete(
            EntityType::Task,
            id.to_string(),
            Some(task.title.clone()),
            &task,
        )?;

        Ok(task)
    }

    fn save_update(&self, before: &Task, after: &Task) -> BudgetResult<()> {
        self.storage.tasks.upsert(after.clone())?;
        self.storage.save(StoreKey::Tasks)?;

        self.storage.log_update(
            EntityType::Task,
            after.id.to_string(),
            Some(after.title.clone()),
            before,
            after,
        )
    }
}
