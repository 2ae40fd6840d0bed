use crate::error::AppError;
use crate::notify::{CompletionNotice, Notifier, Reminder, completion_subject, reminder_subject};
use notify_rust::Notification;

pub struct LinuxNotifier;

impl Notifier for LinuxNotifier {
    fn send_reminder(&self, reminder: &Reminder<'_>) -> Result<(), AppError> {
        Notification::new()
            .summary(&reminder_subject(reminder.task_title, reminder.days_until))
            .body(&format!(
                "{}: due {}",
                reminder.task_title, reminder.due_date
            ))
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }

    fn send_completion_notice(&self, notice: &CompletionNotice<'_>) -> Result<(), AppError> {
        let body = match (notice.recurring, notice.next_due_date) {
            (true, Some(next_due)) => format!(
                "Completed {}. Next due {}.",
                notice.completed_date, next_due
            ),
            _ => format!("Completed {}.", notice.completed_date),
        };

        Notification::new()
            .summary(&completion_subject(notice.task_title))
            .body(&body)
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
