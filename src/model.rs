use chrono::{DateTime, Utc};
use patro::DateKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type TaskId = String;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Tasks grouped by the date they belong to.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct TaskBook {
    #[serde(default)]
    pub tasks: BTreeMap<DateKey, Vec<Task>>,
}

#[derive(thiserror::Error, Debug)]
pub enum TaskError {
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("task {id} not found on {date}")]
    TaskNotFound { date: DateKey, id: TaskId },
}

impl Task {
    pub fn new(id: TaskId, title: String) -> Self {
        Task {
            id,
            title,
            done: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

impl TaskBook {
    pub fn add_task(&mut self, date: DateKey, task: Task) -> Result<(), TaskError> {
        if task.title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        self.tasks.entry(date).or_default().push(task);
        Ok(())
    }

    pub fn tasks_on(&self, date: &DateKey) -> &[Task] {
        self.tasks.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_tasks(&self, date: &DateKey) -> bool {
        !self.tasks_on(date).is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = &DateKey> {
        self.tasks.keys()
    }

    /// Flips the done flag and returns the new state.
    pub fn toggle(&mut self, date: &DateKey, id: &str) -> Result<bool, TaskError> {
        let task = self
            .tasks
            .get_mut(date)
            .and_then(|tasks| tasks.iter_mut().find(|t| t.id == id))
            .ok_or_else(|| not_found(date, id))?;
        task.done = !task.done;
        task.completed_at = if task.done { Some(Utc::now()) } else { None };
        Ok(task.done)
    }

    /// Removes a task. A date left without tasks is dropped from the book.
    pub fn remove(&mut self, date: &DateKey, id: &str) -> Result<Task, TaskError> {
        let tasks = self
            .tasks
            .get_mut(date)
            .ok_or_else(|| not_found(date, id))?;
        let idx = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| not_found(date, id))?;
        let removed = tasks.remove(idx);
        if tasks.is_empty() {
            self.tasks.remove(date);
        }
        Ok(removed)
    }
}

fn not_found(date: &DateKey, id: &str) -> TaskError {
    TaskError::TaskNotFound {
        date: date.clone(),
        id: id.to_string(),
    }
}
