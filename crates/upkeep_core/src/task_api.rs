use crate::clock::{Clock, SystemClock};
use crate::date::{format_date, parse_date};
use crate::error::AppError;
use crate::model::{DEFAULT_REMINDER_DAYS, Owner, Priority, Task, TaskStatus};
use crate::notify::{CompletionNotice, Notifier, notifier_from_env};
use crate::recurrence;
use crate::scanner::{self, LOOKAHEAD_DAYS, ScanResult};
use crate::storage::json_store;
use crate::store::{DueTask, JsonTaskStore, TaskStore};
use std::path::Path;
use time::{Date, Duration, OffsetDateTime};

#[derive(Debug, Clone, Default)]
pub struct NewTask<'a> {
    pub owner_id: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
    pub frequency_days: Option<u32>,
    pub reminder_days_before: Option<u32>,
    pub next_due_date: &'a str,
    pub priority: Priority,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub frequency_days: Option<u32>,
    pub reminder_days_before: Option<u32>,
    pub next_due_date: Option<String>,
    pub priority: Option<Priority>,
}

pub fn add_owner(name: &str, email: &str) -> Result<Owner, AppError> {
    let path = json_store::store_path()?;
    add_owner_with_path(&path, name, email)
}

pub fn add_task(new: &NewTask<'_>) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    add_task_with_path(&path, new, &SystemClock)
}

pub fn edit_task(id: &str, patch: &TaskPatch) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    edit_task_with_path(&path, id, patch)
}

pub fn delete_task(id: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    JsonTaskStore::new(path).delete(id.trim())
}

pub fn get_task_by_id(id: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    JsonTaskStore::new(path).find_by_id(id.trim())
}

pub fn list_tasks() -> Result<Vec<Task>, AppError> {
    let path = json_store::store_path()?;
    list_tasks_with_path(&path)
}

pub fn list_due() -> Result<Vec<DueTask>, AppError> {
    let path = json_store::store_path()?;
    list_due_with_path(&path, &SystemClock)
}

/// Records a completion event: appends the completion record, re-arms the
/// due date for recurring tasks, and persists both in one store write.
/// The confirmation notice is best-effort and never rolls the event back.
pub fn complete_task(id: &str, notes: Option<&str>) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    let notifier = notifier_from_env()?;
    complete_task_with_path(&path, id, SystemClock.today(), notes, notifier.as_ref())
}

/// One reminder pass right now, with the process-wide notifier.
pub fn run_scan() -> Result<ScanResult, AppError> {
    let path = json_store::store_path()?;
    let notifier = notifier_from_env()?;
    let store = JsonTaskStore::new(path);
    scanner::scan(&store, notifier.as_ref(), SystemClock.today())
}

fn add_owner_with_path(path: &Path, name: &str, email: &str) -> Result<Owner, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::invalid_input("name is required"));
    }

    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::invalid_input("a valid email is required"));
    }

    let owner = Owner {
        id: format!("owner-{}", OffsetDateTime::now_utc().unix_timestamp_nanos()),
        name: name.to_string(),
        email: email.to_string(),
    };

    let mut state = json_store::load_state(path)?;
    state.owners.push(owner.clone());
    json_store::save_state(path, &state)?;

    Ok(owner)
}

fn add_task_with_path(path: &Path, new: &NewTask<'_>, clock: &dyn Clock) -> Result<Task, AppError> {
    let title = new.title.trim();
    if title.is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }

    let next_due = parse_date(new.next_due_date)
        .map_err(|_| AppError::invalid_input("next_due_date must be YYYY-MM-DD"))?;

    if new.frequency_days == Some(0) {
        return Err(AppError::invalid_input("frequency_days must be at least 1"));
    }

    let reminder_days_before = new.reminder_days_before.unwrap_or(DEFAULT_REMINDER_DAYS);
    validate_reminder_lead(reminder_days_before)?;

    let mut state = json_store::load_state(path)?;
    let owner_exists = state.owners.iter().any(|owner| owner.id == new.owner_id);
    if !owner_exists {
        return Err(AppError::not_found("owner not found"));
    }

    let task = Task {
        id: format!("task-{}", OffsetDateTime::now_utc().unix_timestamp_nanos()),
        owner_id: new.owner_id.to_string(),
        title: title.to_string(),
        description: new.description.map(|value| value.trim().to_string()),
        category: new.category.map(|value| value.trim().to_string()),
        frequency_days: new.frequency_days,
        reminder_days_before,
        last_completed: None,
        next_due_date: format_date(next_due)?,
        status: TaskStatus::Pending,
        priority: new.priority,
        created_at: format_date(clock.today())?,
        history: Vec::new(),
    };

    state.tasks.push(task.clone());
    json_store::save_state(path, &state)?;

    Ok(task)
}

fn edit_task_with_path(path: &Path, id: &str, patch: &TaskPatch) -> Result<Task, AppError> {
    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }

    if let Some(title) = patch.title.as_deref()
        && title.trim().is_empty()
    {
        return Err(AppError::invalid_input("title must not be blank"));
    }
    if let Some(due) = patch.next_due_date.as_deref() {
        parse_date(due).map_err(|_| AppError::invalid_input("next_due_date must be YYYY-MM-DD"))?;
    }
    if patch.frequency_days == Some(0) {
        return Err(AppError::invalid_input("frequency_days must be at least 1"));
    }
    if let Some(lead) = patch.reminder_days_before {
        validate_reminder_lead(lead)?;
    }

    let mut state = json_store::load_state(path)?;
    let mut updated_task = None;

    for task in &mut state.tasks {
        if task.id == trimmed_id {
            if let Some(title) = patch.title.as_deref() {
                task.title = title.trim().to_string();
            }
            if let Some(description) = patch.description.as_deref() {
                task.description = Some(description.trim().to_string());
            }
            if let Some(category) = patch.category.as_deref() {
                task.category = Some(category.trim().to_string());
            }
            if let Some(frequency_days) = patch.frequency_days {
                task.frequency_days = Some(frequency_days);
            }
            if let Some(lead) = patch.reminder_days_before {
                task.reminder_days_before = lead;
            }
            if let Some(due) = patch.next_due_date.as_deref() {
                task.next_due_date = due.trim().to_string();
                // A new due date re-opens the task for scheduling.
                task.status = TaskStatus::Pending;
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            updated_task = Some(task.clone());
            break;
        }
    }

    let updated = updated_task.ok_or_else(|| AppError::not_found("task not found"))?;
    json_store::save_state(path, &state)?;

    Ok(updated)
}

fn complete_task_with_path(
    path: &Path,
    id: &str,
    completion_date: Date,
    notes: Option<&str>,
    notifier: &dyn Notifier,
) -> Result<Task, AppError> {
    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }

    let mut state = json_store::load_state(path)?;
    let index = state
        .tasks
        .iter()
        .position(|task| task.id == trimmed_id)
        .ok_or_else(|| AppError::not_found("task not found"))?;

    let outcome = recurrence::complete(&state.tasks[index], completion_date, notes)?;
    let owner = state
        .owners
        .iter()
        .find(|owner| owner.id == outcome.task.owner_id)
        .ok_or_else(|| {
            AppError::not_found(format!("owner {} not found", outcome.task.owner_id))
        })?
        .clone();

    state.tasks[index] = outcome.task.clone();
    json_store::save_state(path, &state)?;

    let recurring = outcome.task.is_recurring();
    let notice = CompletionNotice {
        email: &owner.email,
        owner_name: &owner.name,
        task_title: &outcome.task.title,
        completed_date: &outcome.entry.completed_date,
        next_due_date: recurring.then_some(outcome.task.next_due_date.as_str()),
        recurring,
    };
    if let Err(err) = notifier.send_completion_notice(&notice) {
        log::warn!(
            "completion notice for task {} failed: {err}",
            outcome.task.id
        );
    }

    Ok(outcome.task)
}

fn list_tasks_with_path(path: &Path) -> Result<Vec<Task>, AppError> {
    let mut tasks = json_store::load_state(path)?.tasks;
    tasks.sort_by(|a, b| a.next_due_date.cmp(&b.next_due_date));
    Ok(tasks)
}

fn list_due_with_path(path: &Path, clock: &dyn Clock) -> Result<Vec<DueTask>, AppError> {
    let today = clock.today();
    let horizon = today
        .checked_add(Duration::days(LOOKAHEAD_DAYS))
        .ok_or_else(|| AppError::invalid_data("lookahead horizon out of range"))?;
    JsonTaskStore::new(path.to_path_buf()).find_due(today, horizon)
}

fn validate_reminder_lead(lead: u32) -> Result<(), AppError> {
    if i64::from(lead) > LOOKAHEAD_DAYS {
        return Err(AppError::invalid_input(format!(
            "reminder lead must not exceed the {LOOKAHEAD_DAYS}-day scan window"
        )));
    }
    Ok(())
}
