use crate::error::AppError;
use crate::notify::{CompletionNotice, Notifier, Reminder, completion_subject, reminder_subject};
use tauri_winrt_notification::Toast;

pub struct WindowsNotifier;

impl Notifier for WindowsNotifier {
    fn send_reminder(&self, reminder: &Reminder<'_>) -> Result<(), AppError> {
        Toast::new(Toast::POWERSHELL_APP_ID)
            .title(&reminder_subject(reminder.task_title, reminder.days_until))
            .text1(reminder.task_title)
            .text2(&format!("Due {}", reminder.due_date))
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }

    fn send_completion_notice(&self, notice: &CompletionNotice<'_>) -> Result<(), AppError> {
        let detail = match (notice.recurring, notice.next_due_date) {
            (true, Some(next_due)) => format!("Next due {next_due}"),
            _ => format!("Completed {}", notice.completed_date),
        };

        Toast::new(Toast::POWERSHELL_APP_ID)
            .title(&completion_subject(notice.task_title))
            .text1(notice.task_title)
            .text2(&detail)
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
