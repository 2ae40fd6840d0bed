mod task;

pub use task::{CompletionEntry, DEFAULT_REMINDER_DAYS, Owner, Priority, Task, TaskStatus};
