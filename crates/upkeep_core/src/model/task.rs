use serde::{Deserialize, Serialize};

pub const DEFAULT_REMINDER_DAYS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEntry {
    pub completed_date: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Recurrence interval in days; absent means one-shot.
    #[serde(default)]
    pub frequency_days: Option<u32>,
    #[serde(default = "default_reminder_days")]
    pub reminder_days_before: u32,
    #[serde(default)]
    pub last_completed: Option<String>,
    /// The authoritative date scheduling acts on, `YYYY-MM-DD`.
    pub next_due_date: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: String,
    /// Append-only completion records; removed only when the task is deleted.
    #[serde(default)]
    pub history: Vec<CompletionEntry>,
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        self.frequency_days.is_some()
    }
}

fn default_reminder_days() -> u32 {
    DEFAULT_REMINDER_DAYS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}
