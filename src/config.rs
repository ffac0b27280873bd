use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Directory name under the platform config dir.
pub const APP_DIR: &str = "course-module-filter";

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "COURSE_FILTER_CONFIG";

// ---------------------------------------------------------------------------
// Layout markers
// ---------------------------------------------------------------------------

/// Class names that identify the two page layouts and the row stripes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMarkers {
    /// Class on the `<table>` of the list layout.
    pub list_table_class: String,
    /// Class on the element wrapping thumbnail cards.
    pub thumbnail_container_class: String,
    /// Class of the card sub-element whose `title` holds the schedule.
    pub thumbnail_detail_class: String,
    pub row_odd_class: String,
    pub row_even_class: String,
}

impl Default for LayoutMarkers {
    fn default() -> Self {
        Self {
            list_table_class: "course-list".to_string(),
            thumbnail_container_class: "course-thumbnails".to_string(),
            thumbnail_detail_class: "course-schedule".to_string(),
            row_odd_class: "row-odd".to_string(),
            row_even_class: "row-even".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub markers: LayoutMarkers,
    /// Used when the page carries no `<html lang>`.
    pub default_language: String,
    /// Preference file; `None` means `<config dir>/course-module-filter/preferences.json`.
    pub preferences_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            markers: LayoutMarkers::default(),
            default_language: "en".to_string(),
            preferences_path: None,
        }
    }
}

impl Config {
    /// Load from `$COURSE_FILTER_CONFIG`, else the default location.
    /// A missing file yields the defaults.
    pub fn load() -> Result<Config> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from(Path::new(&path)),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Config> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.preferences_path
            .clone()
            .or_else(|| dirs::config_dir().map(|dir| dir.join(APP_DIR).join("preferences.json")))
            .unwrap_or_else(|| PathBuf::from("preferences.json"))
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}
