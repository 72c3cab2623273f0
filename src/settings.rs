// src/settings.rs
//
// Persisted user settings (JSON under the platform config directory).
// Serial line parameters are fixed and deliberately not configurable here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::P10Error;

const APP_DIR_NAME: &str = "P10Link";
const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// Port used when the caller does not name one
    #[serde(default)]
    pub default_port: Option<String>,
    /// Directory for timestamped log files
    #[serde(default = "default_reports_dir")]
    pub reports_dir: String,
    /// Mirror log output to a file in `reports_dir`
    #[serde(default)]
    pub file_logging: bool,
}

fn default_reports_dir() -> String {
    dirs::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join("Reports")
        .to_string_lossy()
        .to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_port: None,
            reports_dir: default_reports_dir(),
            file_logging: false,
        }
    }
}

/// `<config_dir>/P10Link/settings.json`
pub fn settings_path() -> Result<PathBuf, P10Error> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| P10Error::settings("Failed to get app config dir"))?;
    Ok(config_dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
}

/// Load settings from the default location, writing defaults on first run.
pub fn load_settings() -> Result<AppSettings, P10Error> {
    load_settings_from(&settings_path()?)
}

pub fn load_settings_from(path: &Path) -> Result<AppSettings, P10Error> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .map_err(|e| P10Error::settings(format!("Failed to read settings: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| P10Error::settings(format!("Failed to parse settings: {}", e)))
    } else {
        let settings = AppSettings::default();
        save_settings_to(path, &settings)?;
        tlog!("[settings] Created default settings at {}", path.display());
        Ok(settings)
    }
}

pub fn save_settings(settings: &AppSettings) -> Result<(), P10Error> {
    save_settings_to(&settings_path()?, settings)
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<(), P10Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| P10Error::settings(format!("Failed to create config dir: {}", e)))?;
    }

    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| P10Error::settings(format!("Failed to serialize settings: {}", e)))?;

    std::fs::write(path, content)
        .map_err(|e| P10Error::settings(format!("Failed to write settings: {}", e)))
}
