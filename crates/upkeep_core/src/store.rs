use crate::date::parse_date;
use crate::error::AppError;
use crate::model::{Task, TaskStatus};
use crate::storage::json_store;
use std::path::PathBuf;
use time::Date;

/// A task joined with its owner's contact details, as the scanner needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueTask {
    pub task: Task,
    pub owner_name: String,
    pub owner_email: String,
}

/// Narrow store seam consumed by the scanner and scheduler. `save_task`
/// replaces the stored record wholesale, so a completion's history append
/// and field updates land as one write.
pub trait TaskStore {
    fn find_due(&self, from: Date, to: Date) -> Result<Vec<DueTask>, AppError>;
    fn find_by_id(&self, id: &str) -> Result<Task, AppError>;
    fn save_task(&self, task: &Task) -> Result<(), AppError>;
    fn delete(&self, id: &str) -> Result<Task, AppError>;
}

/// A completed one-shot task is terminal; a recurring task stays
/// schedulable for its re-armed due date regardless of status.
pub fn due_eligible(task: &Task) -> bool {
    task.status == TaskStatus::Pending || task.is_recurring()
}

pub struct JsonTaskStore {
    path: PathBuf,
}

impl JsonTaskStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn open_default() -> Result<Self, AppError> {
        Ok(Self::new(json_store::store_path()?))
    }
}

impl TaskStore for JsonTaskStore {
    fn find_due(&self, from: Date, to: Date) -> Result<Vec<DueTask>, AppError> {
        let state = json_store::load_state(&self.path)?;
        let mut due = Vec::new();

        for task in &state.tasks {
            if !due_eligible(task) {
                continue;
            }

            let next_due = parse_date(&task.next_due_date)?;
            if next_due < from || next_due > to {
                continue;
            }

            let owner = state
                .owners
                .iter()
                .find(|owner| owner.id == task.owner_id)
                .ok_or_else(|| AppError::not_found(format!("owner {} not found", task.owner_id)))?;

            due.push(DueTask {
                task: task.clone(),
                owner_name: owner.name.clone(),
                owner_email: owner.email.clone(),
            });
        }

        due.sort_by(|a, b| a.task.next_due_date.cmp(&b.task.next_due_date));
        Ok(due)
    }

    fn find_by_id(&self, id: &str) -> Result<Task, AppError> {
        let state = json_store::load_state(&self.path)?;
        state
            .tasks
            .into_iter()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::not_found("task not found"))
    }

    fn save_task(&self, task: &Task) -> Result<(), AppError> {
        let mut state = json_store::load_state(&self.path)?;
        let slot = state
            .tasks
            .iter_mut()
            .find(|stored| stored.id == task.id)
            .ok_or_else(|| AppError::not_found("task not found"))?;
        *slot = task.clone();
        json_store::save_state(&self.path, &state)
    }

    fn delete(&self, id: &str) -> Result<Task, AppError> {
        let mut state = json_store::load_state(&self.path)?;
        let index = state
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| AppError::not_found("task not found"))?;

        let removed = state.tasks.remove(index);
        json_store::save_state(&self.path, &state)?;
        Ok(removed)
    }
}
