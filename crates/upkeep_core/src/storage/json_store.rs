use crate::error::AppError;
use crate::model::{Owner, Task};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "tasks.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredState {
    schema_version: u32,
    #[serde(default)]
    owners: Vec<Owner>,
    tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlannerState {
    pub owners: Vec<Owner>,
    pub tasks: Vec<Task>,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var("UPKEEP_STORE_PATH")
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("upkeep").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("upkeep")
            .join(STORE_FILE_NAME))
    }
}

pub fn load_state(path: &Path) -> Result<PlannerState, AppError> {
    if !path.exists() {
        return Ok(PlannerState::default());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    let stored: StoredState =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;

    if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
        return Err(AppError::invalid_data("schema_version mismatch"));
    }

    for task in &stored.tasks {
        let exists = stored.owners.iter().any(|owner| owner.id == task.owner_id);
        if !exists {
            return Err(AppError::invalid_data(format!(
                "task {} references unknown owner {}",
                task.id, task.owner_id
            )));
        }
    }

    Ok(PlannerState {
        owners: stored.owners,
        tasks: stored.tasks,
    })
}

/// Rewrites the whole state file in one write; callers that mutate a task
/// and its history together get both changes or neither.
pub fn save_state(path: &Path, state: &PlannerState) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let stored = StoredState {
        schema_version: SCHEMA_VERSION,
        owners: state.owners.to_vec(),
        tasks: state.tasks.to_vec(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    Ok(())
}
