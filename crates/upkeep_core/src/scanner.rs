use crate::date::parse_date;
use crate::error::AppError;
use crate::notify::{Notifier, Reminder};
use crate::store::TaskStore;
use time::{Date, Duration};

/// How far ahead of today each scan queries. Task creation validates that
/// no task's reminder lead exceeds this, otherwise the lead-time reminder
/// would be silently suppressed.
pub const LOOKAHEAD_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanResult {
    /// Tasks whose due date fell inside the lookahead window.
    pub considered: usize,
    /// Reminders actually delivered; failed sends are logged, not counted.
    pub notified: usize,
}

/// One reminder pass. A task is notified when today is exactly its
/// configured lead time before the due date, or the due date itself.
/// There is no persisted sent-flag: the rule re-evaluates identically on
/// every tick, so delivery is at-least-once per cycle.
pub fn scan(
    store: &dyn TaskStore,
    notifier: &dyn Notifier,
    today: Date,
) -> Result<ScanResult, AppError> {
    let horizon = today
        .checked_add(Duration::days(LOOKAHEAD_DAYS))
        .ok_or_else(|| AppError::invalid_data("scan horizon out of range"))?;

    let candidates = store.find_due(today, horizon)?;
    let considered = candidates.len();
    let mut notified = 0;

    for due in &candidates {
        let next_due = parse_date(&due.task.next_due_date)?;
        let days_until = (next_due - today).whole_days();

        if days_until != i64::from(due.task.reminder_days_before) && days_until != 0 {
            continue;
        }

        let reminder = Reminder {
            email: &due.owner_email,
            owner_name: &due.owner_name,
            task_title: &due.task.title,
            due_date: &due.task.next_due_date,
            days_until,
        };

        match notifier.send_reminder(&reminder) {
            Ok(()) => notified += 1,
            Err(err) => {
                log::warn!("reminder for task {} failed: {err}", due.task.id);
            }
        }
    }

    log::info!("reminder scan: considered {considered}, notified {notified}");
    Ok(ScanResult {
        considered,
        notified,
    })
}
