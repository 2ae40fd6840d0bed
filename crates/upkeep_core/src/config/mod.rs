use crate::error::AppError;
use crate::model::DEFAULT_REMINDER_DAYS;
use crate::scanner::LOOKAHEAD_DAYS;
use crate::scheduler::ScanTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "UPKEEP_CONFIG_PATH";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Daily scan time as `HH:MM`; 09:00 when absent.
    #[serde(default)]
    pub scan_time: Option<String>,
    /// Lead time applied to new tasks that don't set their own.
    #[serde(default)]
    pub default_reminder_days: Option<u32>,
}

impl Config {
    pub fn scan_time(&self) -> Result<ScanTime, AppError> {
        match self.scan_time.as_deref() {
            Some(raw) => ScanTime::parse(raw),
            None => Ok(ScanTime::DEFAULT),
        }
    }

    pub fn reminder_lead(&self) -> u32 {
        self.default_reminder_days.unwrap_or(DEFAULT_REMINDER_DAYS)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("upkeep").join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("upkeep")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;

    config.scan_time()?;
    if let Some(lead) = config.default_reminder_days
        && i64::from(lead) > LOOKAHEAD_DAYS
    {
        return Err(AppError::invalid_data(format!(
            "default_reminder_days must not exceed the {LOOKAHEAD_DAYS}-day scan window"
        )));
    }

    Ok(config)
}
