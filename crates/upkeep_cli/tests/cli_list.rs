use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("upkeep-{nanos}-{file_name}"))
}

fn local_today() -> Date {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset).date()
}

fn date_string(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .expect("format date")
}

fn write_store(path: &PathBuf, tasks: serde_json::Value) {
    let content = serde_json::json!({
        "schema_version": 1,
        "owners": [
            {
                "id": "owner-1",
                "name": "Sam",
                "email": "sam@example.com"
            }
        ],
        "tasks": tasks
    });
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn task_due(id: &str, due: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "owner_id": "owner-1",
        "title": format!("task {id}"),
        "frequency_days": null,
        "reminder_days_before": 3,
        "next_due_date": due,
        "status": "pending",
        "priority": "medium",
        "created_at": "2025-01-01",
        "history": []
    })
}

fn run_upkeep(store_path: &PathBuf, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_upkeep"))
        .args(args)
        .env("UPKEEP_STORE_PATH", store_path)
        .env("UPKEEP_DISABLE_NOTIFICATIONS", "1")
        .output()
        .expect("failed to run upkeep")
}

#[test]
fn list_all_json_orders_by_due_date() {
    let store_path = temp_path("cli-list-all.json");

    write_store(
        &store_path,
        serde_json::json!([
            task_due("late", "2025-09-01"),
            task_due("soon", "2025-06-01"),
        ]),
    );

    let output = run_upkeep(&store_path, &["list", "all", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let tasks: serde_json::Value = serde_json::from_slice(&output.stdout).expect("tasks json");
    let tasks = tasks.as_array().expect("tasks array");
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["id"], "soon");
    assert_eq!(tasks[1]["id"], "late");
}

#[test]
fn list_due_filters_to_the_scan_window() {
    let store_path = temp_path("cli-list-due.json");
    let today = local_today();

    write_store(
        &store_path,
        serde_json::json!([
            task_due("inside", &date_string(today + Duration::days(2))),
            task_due("outside", &date_string(today + Duration::days(20))),
        ]),
    );

    let output = run_upkeep(&store_path, &["list", "due", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let due: serde_json::Value = serde_json::from_slice(&output.stdout).expect("due json");
    let due = due.as_array().expect("due array");
    assert_eq!(due.len(), 1);
    assert_eq!(due[0]["id"], "inside");
    assert_eq!(due[0]["owner_email"], "sam@example.com");
}

#[test]
fn list_all_plain_text_renders_table() {
    let store_path = temp_path("cli-list-plain.json");

    write_store(&store_path, serde_json::json!([task_due("soon", "2025-06-01")]));

    let output = run_upkeep(&store_path, &["list", "all"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("task soon"));
    assert!(stdout.contains("2025-06-01"));
}

#[test]
fn list_all_reports_empty_store() {
    let store_path = temp_path("cli-list-empty.json");

    write_store(&store_path, serde_json::json!([]));

    let output = run_upkeep(&store_path, &["list", "all"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No tasks."));
}
