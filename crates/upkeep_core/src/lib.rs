pub mod clock;
pub mod config;
pub mod date;
pub mod error;
pub mod model;
pub mod notify;
pub mod recurrence;
pub mod scanner;
pub mod scheduler;
pub mod storage;
pub mod store;
pub mod task_api;

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::{Priority, Task, TaskStatus};

    #[test]
    fn task_has_required_fields() {
        let task = Task {
            id: "task-1".to_string(),
            owner_id: "owner-1".to_string(),
            title: "Clean gutters".to_string(),
            description: None,
            category: None,
            frequency_days: Some(180),
            reminder_days_before: 3,
            last_completed: None,
            next_due_date: "2025-06-01".to_string(),
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            created_at: "2025-01-01".to_string(),
            history: Vec::new(),
        };

        assert_eq!(task.id, "task-1");
        assert_eq!(task.owner_id, "owner-1");
        assert!(task.is_recurring());
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.history.is_empty());
    }

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::invalid_input("missing title");
        assert_eq!(err.code(), "invalid_input");
    }
}
