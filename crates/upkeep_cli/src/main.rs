use clap::Parser;
use std::sync::Arc;
use tabled::{Table, Tabled};
use upkeep_cli::cli::{Cli, Command, ListCommand, OwnerCommand};
use upkeep_core::clock::SystemClock;
use upkeep_core::config;
use upkeep_core::error::AppError;
use upkeep_core::model::{Priority, Task, TaskStatus};
use upkeep_core::notify::notifier_from_env;
use upkeep_core::scheduler::Scheduler;
use upkeep_core::store::{DueTask, JsonTaskStore};
use upkeep_core::task_api::{self, NewTask, TaskPatch};

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::Completed => "completed",
    }
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
    }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Every")]
    every: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Priority")]
    priority: &'static str,
}

impl TaskRow {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            due: task.next_due_date.clone(),
            every: task
                .frequency_days
                .map(|days| format!("{days}d"))
                .unwrap_or_else(|| "-".to_string()),
            status: status_label(task.status),
            priority: priority_label(task.priority),
        }
    }
}

fn print_tasks_plain(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    let rows: Vec<TaskRow> = tasks.iter().map(TaskRow::from_task).collect();
    println!("{}", Table::new(rows));
}

fn print_due_plain(due: &[DueTask]) {
    if due.is_empty() {
        println!("Nothing due in the next week.");
        return;
    }
    for item in due {
        println!(
            "{} | {} | due {} | {}",
            item.task.id, item.task.title, item.task.next_due_date, item.owner_name
        );
    }
}

fn print_task_json(task: &Task) -> Result<(), AppError> {
    let json = serde_json::to_string(task)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn print_tasks_json(tasks: &[Task]) -> Result<(), AppError> {
    let json = serde_json::to_string(tasks)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn print_due_json(due: &[DueTask]) -> Result<(), AppError> {
    let mut payload = Vec::with_capacity(due.len());
    for item in due {
        payload.push(serde_json::json!({
            "id": item.task.id,
            "title": item.task.title,
            "next_due_date": item.task.next_due_date,
            "owner_name": item.owner_name,
            "owner_email": item.owner_email,
        }));
    }
    println!("{}", serde_json::Value::Array(payload));
    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn run_daemon() -> Result<(), AppError> {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        log::warn!("config unusable, using defaults: {err}");
    }

    let scheduler = Scheduler::new(
        Arc::new(JsonTaskStore::open_default()?),
        Arc::from(notifier_from_env()?),
        Arc::new(SystemClock),
        loaded.config.scan_time()?,
    );

    if !scheduler.start() {
        return Err(AppError::invalid_data("scheduler failed to start"));
    }

    loop {
        std::thread::park();
    }
}

fn run_command(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Owner { owner } => match owner {
            OwnerCommand::Add { name, email } => {
                let added = task_api::add_owner(&name, &email)?;
                if cli.json {
                    println!(
                        "{}",
                        serde_json::json!({
                            "id": added.id,
                            "name": added.name,
                            "email": added.email,
                        })
                    );
                } else {
                    println!("Added owner: {} ({})", added.name, added.id);
                }
            }
        },
        Command::Add {
            owner_id,
            title,
            due,
            frequency_days,
            reminder_days_before,
            description,
            category,
            priority,
        } => {
            let loaded = config::load_config_with_fallback();
            if let Some(err) = loaded.error {
                log::warn!("config unusable, using defaults: {err}");
            }

            let task = task_api::add_task(&NewTask {
                owner_id: &owner_id,
                title: &title,
                description: description.as_deref(),
                category: category.as_deref(),
                frequency_days,
                reminder_days_before: Some(
                    reminder_days_before.unwrap_or_else(|| loaded.config.reminder_lead()),
                ),
                next_due_date: &due,
                priority: priority.map(Into::into).unwrap_or_default(),
            })?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Added task: {} ({}) due {}", task.title, task.id, task.next_due_date);
            }
        }
        Command::Edit {
            id,
            title,
            due,
            frequency_days,
            reminder_days_before,
            description,
            category,
            priority,
        } => {
            let task = task_api::edit_task(
                &id,
                &TaskPatch {
                    title,
                    description,
                    category,
                    frequency_days,
                    reminder_days_before,
                    next_due_date: due,
                    priority: priority.map(Into::into),
                },
            )?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Updated task: {} ({})", task.title, task.id);
            }
        }
        Command::Delete { id } => {
            let task = task_api::delete_task(&id)?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Deleted task: {} ({})", task.title, task.id);
            }
        }
        Command::Done { id, message } => {
            let task = task_api::complete_task(&id, message.as_deref())?;
            if cli.json {
                print_task_json(&task)?;
            } else if task.is_recurring() {
                println!(
                    "Completed task: {} ({}), next due {}",
                    task.title, task.id, task.next_due_date
                );
            } else {
                println!("Completed task: {} ({})", task.title, task.id);
            }
        }
        Command::Show { id } => {
            let task = task_api::get_task_by_id(&id)?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("{} | {} | due {}", task.id, task.title, task.next_due_date);
                println!(
                    "status: {} | priority: {} | remind {}d before",
                    status_label(task.status),
                    priority_label(task.priority),
                    task.reminder_days_before
                );
                if let Some(every) = task.frequency_days {
                    println!("repeats every {every} days");
                }
                if task.history.is_empty() {
                    println!("no completions yet");
                } else {
                    println!("completions:");
                    for entry in &task.history {
                        match entry.notes.as_deref() {
                            Some(notes) => println!("  {} - {notes}", entry.completed_date),
                            None => println!("  {}", entry.completed_date),
                        }
                    }
                }
            }
        }
        Command::List { list } => match list {
            ListCommand::Due => {
                let due = task_api::list_due()?;
                if cli.json {
                    print_due_json(&due)?;
                } else {
                    print_due_plain(&due);
                }
            }
            ListCommand::All => {
                let tasks = task_api::list_tasks()?;
                if cli.json {
                    print_tasks_json(&tasks)?;
                } else {
                    print_tasks_plain(&tasks);
                }
            }
        },
        Command::Scan => {
            let result = task_api::run_scan()?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "considered": result.considered,
                        "notified": result.notified,
                    })
                );
            } else {
                println!(
                    "Scan complete: {} considered, {} notified",
                    result.considered, result.notified
                );
            }
        }
        Command::Daemon => run_daemon()?,
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
