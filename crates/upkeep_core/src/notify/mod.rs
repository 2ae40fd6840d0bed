use crate::error::AppError;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsNotifier;

/// A scheduled reminder about an upcoming due date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder<'a> {
    pub email: &'a str,
    pub owner_name: &'a str,
    pub task_title: &'a str,
    pub due_date: &'a str,
    pub days_until: i64,
}

/// Confirmation sent after a completion event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionNotice<'a> {
    pub email: &'a str,
    pub owner_name: &'a str,
    pub task_title: &'a str,
    pub completed_date: &'a str,
    pub next_due_date: Option<&'a str>,
    pub recurring: bool,
}

/// Injected delivery capability. Implementations must return promptly;
/// the scanner treats any error as attempted-but-failed and moves on.
pub trait Notifier {
    fn send_reminder(&self, reminder: &Reminder<'_>) -> Result<(), AppError>;

    fn send_completion_notice(&self, notice: &CompletionNotice<'_>) -> Result<(), AppError>;
}

pub fn reminder_subject(task_title: &str, days_until: i64) -> String {
    match days_until {
        0 => format!("Urgent: {task_title} is due today"),
        1 => format!("Reminder: {task_title} is due tomorrow"),
        days => format!("Reminder: {task_title} is due in {days} days"),
    }
}

pub fn completion_subject(task_title: &str) -> String {
    format!("Task completed: {task_title}")
}

/// Stand-in for a real mail transport: writes the message to stdout.
/// This is the delivery channel itself, not diagnostics, so it prints
/// rather than logging.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn send_reminder(&self, reminder: &Reminder<'_>) -> Result<(), AppError> {
        println!(
            "REMINDER to {} <{}>: {}",
            reminder.owner_name, reminder.email, reminder_subject(reminder.task_title, reminder.days_until)
        );
        println!(
            "  Task: {} | Due: {} | Days until due: {}",
            reminder.task_title,
            reminder.due_date,
            if reminder.days_until == 0 {
                "today".to_string()
            } else {
                reminder.days_until.to_string()
            }
        );
        Ok(())
    }

    fn send_completion_notice(&self, notice: &CompletionNotice<'_>) -> Result<(), AppError> {
        println!(
            "NOTICE to {} <{}>: {}",
            notice.owner_name,
            notice.email,
            completion_subject(notice.task_title)
        );
        match (notice.recurring, notice.next_due_date) {
            (true, Some(next_due)) => {
                println!("  Completed: {} | Next due: {}", notice.completed_date, next_due);
            }
            _ => {
                println!("  Completed: {}", notice.completed_date);
            }
        }
        Ok(())
    }
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn send_reminder(&self, _reminder: &Reminder<'_>) -> Result<(), AppError> {
        Ok(())
    }

    fn send_completion_notice(&self, _notice: &CompletionNotice<'_>) -> Result<(), AppError> {
        Ok(())
    }
}

/// Builds the process-wide notifier once at startup. Platforms without a
/// desktop notification backend fall back to the console transport.
pub fn notifier_from_env() -> Result<Box<dyn Notifier + Send + Sync>, AppError> {
    if std::env::var("UPKEEP_DISABLE_NOTIFICATIONS").is_ok() {
        return Ok(Box::new(NoopNotifier));
    }

    match platform_notifier() {
        Ok(notifier) => Ok(notifier),
        Err(err) => match err {
            AppError::InvalidData(_) => Ok(Box::new(ConsoleNotifier)),
            other => Err(other),
        },
    }
}

#[cfg(target_os = "linux")]
pub fn platform_notifier() -> Result<Box<dyn Notifier + Send + Sync>, AppError> {
    Ok(Box::new(LinuxNotifier))
}

#[cfg(windows)]
pub fn platform_notifier() -> Result<Box<dyn Notifier + Send + Sync>, AppError> {
    Ok(Box::new(WindowsNotifier))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier() -> Result<Box<dyn Notifier + Send + Sync>, AppError> {
    Err(AppError::invalid_data(
        "desktop notifications are not supported on this platform",
    ))
}
