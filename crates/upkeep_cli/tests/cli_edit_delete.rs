use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("upkeep-{nanos}-{file_name}"))
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

fn seed_task(path: &PathBuf, status: &str) {
    write_store(
        path,
        serde_json::json!([
            {
                "id": "task-1",
                "owner_id": "owner-1",
                "title": "Service boiler",
                "frequency_days": 365,
                "reminder_days_before": 3,
                "next_due_date": "2025-06-01",
                "status": status,
                "priority": "medium",
                "created_at": "2025-01-01",
                "history": []
            }
        ]),
    );
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
fn edit_updates_only_given_fields() {
    let store_path = temp_path("cli-edit.json");
    seed_task(&store_path, "pending");

    let output = run_upkeep(
        &store_path,
        &["edit", "task-1", "--title", "Service boiler and radiators", "--priority", "high"],
    );
    assert!(output.status.success());

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    let task = &stored["tasks"][0];
    assert_eq!(task["title"], "Service boiler and radiators");
    assert_eq!(task["priority"], "high");
    assert_eq!(task["next_due_date"], "2025-06-01");
    assert_eq!(task["frequency_days"], 365);
}

#[test]
fn edit_due_date_reopens_completed_task() {
    let store_path = temp_path("cli-edit-reopen.json");
    seed_task(&store_path, "completed");

    let output = run_upkeep(&store_path, &["edit", "task-1", "--due", "2025-09-15"]);
    assert!(output.status.success());

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    let task = &stored["tasks"][0];
    assert_eq!(task["next_due_date"], "2025-09-15");
    assert_eq!(task["status"], "pending");
}

#[test]
fn edit_rejects_excessive_reminder_lead() {
    let store_path = temp_path("cli-edit-lead.json");
    seed_task(&store_path, "pending");

    let output = run_upkeep(&store_path, &["edit", "task-1", "--remind", "30"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn delete_removes_task_from_store() {
    let store_path = temp_path("cli-delete.json");
    seed_task(&store_path, "pending");

    let output = run_upkeep(&store_path, &["delete", "task-1"]);
    assert!(output.status.success());

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(stored["tasks"].as_array().unwrap().is_empty());
    // Owners survive task deletion.
    assert_eq!(stored["owners"].as_array().unwrap().len(), 1);
}

#[test]
fn delete_reports_missing_task() {
    let store_path = temp_path("cli-delete-missing.json");
    write_store(&store_path, serde_json::json!([]));

    let output = run_upkeep(&store_path, &["delete", "task-9"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: not_found"));
}
