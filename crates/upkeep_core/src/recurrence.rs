use crate::date::{format_date, parse_date};
use crate::error::AppError;
use crate::model::{CompletionEntry, Task, TaskStatus};
use time::{Date, Duration};

/// Result of running a completion event through the engine: the record to
/// append and the task as it should be persisted. Both must be written as
/// one unit; with the record nested in the task that is a single store write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub task: Task,
    pub entry: CompletionEntry,
}

/// Applies a completion event to a task.
///
/// A completion is always recorded, even on a task that is already
/// completed; re-completing recomputes the next due date from the newer
/// date. Recurring tasks re-arm to `completion_date + frequency_days`;
/// one-shot tasks keep their due date and become terminally completed.
pub fn complete(
    task: &Task,
    completion_date: Date,
    notes: Option<&str>,
) -> Result<CompletionOutcome, AppError> {
    let notes = match notes {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(AppError::invalid_input("notes must not be blank"));
            }
            Some(trimmed.to_string())
        }
        None => None,
    };

    let completed_date = format_date(completion_date)?;
    let entry = CompletionEntry {
        completed_date: completed_date.clone(),
        notes,
    };

    let mut updated = task.clone();
    updated.last_completed = Some(completed_date);
    updated.status = TaskStatus::Completed;
    updated.history.push(entry.clone());

    if let Some(frequency_days) = task.frequency_days {
        let next_due = next_due_date(completion_date, frequency_days)?;
        updated.next_due_date = format_date(next_due)?;
    }

    Ok(CompletionOutcome {
        task: updated,
        entry,
    })
}

/// Calendar-day arithmetic; month and year boundaries roll over exactly.
pub fn next_due_date(completion_date: Date, frequency_days: u32) -> Result<Date, AppError> {
    completion_date
        .checked_add(Duration::days(i64::from(frequency_days)))
        .ok_or_else(|| AppError::invalid_data("next due date out of range"))
}
