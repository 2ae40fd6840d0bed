use clap::{Parser, Subcommand, ValueEnum};
use upkeep_core::model::Priority;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage household members
    Owner {
        #[command(subcommand)]
        owner: OwnerCommand,
    },
    /// Add a maintenance task
    ///
    /// Example: upkeep add owner-1 "Clean gutters" 2025-06-01 --every 180
    Add {
        owner_id: String,
        title: String,
        /// Due date, YYYY-MM-DD
        due: String,
        /// Repeat every N days after completion; omit for a one-shot task
        #[arg(long = "every", value_name = "DAYS")]
        frequency_days: Option<u32>,
        /// Days of warning before the due date
        #[arg(long = "remind", value_name = "DAYS")]
        reminder_days_before: Option<u32>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
    },
    /// Edit a task; only the given fields change
    ///
    /// Example: upkeep edit task-1 --due 2025-08-01 --priority high
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        due: Option<String>,
        #[arg(long = "every", value_name = "DAYS")]
        frequency_days: Option<u32>,
        #[arg(long = "remind", value_name = "DAYS")]
        reminder_days_before: Option<u32>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
    },
    /// Delete a task
    Delete {
        id: String,
    },
    /// Record a completion; recurring tasks are re-armed
    ///
    /// Example: upkeep done task-1 -m "replaced both filters"
    Done {
        id: String,
        #[arg(short = 'm', long = "message", value_name = "MESSAGE")]
        message: Option<String>,
    },
    /// Show a task with its completion history
    Show {
        id: String,
    },
    /// List tasks
    ///
    /// Example: upkeep list due
    /// Example: upkeep list all
    List {
        #[command(subcommand)]
        list: ListCommand,
    },
    /// Run one reminder pass now
    Scan,
    /// Run the daily reminder scheduler in the foreground
    Daemon,
}

#[derive(Subcommand, Debug)]
pub enum OwnerCommand {
    /// Register a household member
    ///
    /// Example: upkeep owner add "Sam" sam@example.com
    Add { name: String, email: String },
}

#[derive(Subcommand, Debug)]
pub enum ListCommand {
    /// Tasks due within the scan window
    Due,
    /// Every task, soonest due first
    All,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}
