// User settings
// Loaded from ~/.config/gridveil/settings.json

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum SettingsError {
    Io(String),
    Parse(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "settings I/O error: {msg}"),
            Self::Parse(msg) => write!(f, "settings parse error: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Storage
    #[serde(rename = "storage.directory")]
    pub storage_directory: Option<PathBuf>, // None = platform data dir

    // Undo
    #[serde(rename = "history.maxEntries")]
    pub history_max_entries: usize,

    // Selection menu
    #[serde(rename = "selection.menuWidth")]
    pub menu_width: f32,

    #[serde(rename = "selection.menuItemHeight")]
    pub menu_item_height: f32,

    // AI context
    #[serde(rename = "context.maxRowLabels")]
    pub max_row_labels: usize,

    #[serde(rename = "context.maxFormulas")]
    pub max_formulas: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_directory: None,
            history_max_entries: 100,
            menu_width: 200.0,
            menu_item_height: 24.0,
            max_row_labels: 25,
            max_formulas: 15,
        }
    }
}

const DEFAULT_FILE: &str = r#"{
    // Where visibility overrides are kept (null = platform data directory)
    "storage.directory": null,

    // Undo depth for visibility changes (0 disables undo)
    "history.maxEntries": 100,

    // Action menu metrics, used to keep the menu on screen
    "selection.menuWidth": 200,
    "selection.menuItemHeight": 24,

    // How much of each sheet is described to the AI
    "context.maxRowLabels": 25,
    "context.maxFormulas": 15
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridveil")
            .join("settings.json")
    }

    /// Load from the default location, writing a commented default file on
    /// first run. Never fails; problems are logged and defaults used.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            if let Err(e) = write_default_file(&path) {
                log::warn!("Could not create {}: {e}", path.display());
            }
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            log::warn!("{e}; using default settings");
            Self::default()
        })
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SettingsError::Io(format!("{}: {e}", path.display())))?;
        Self::parse(&contents)
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, SettingsError> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned).map_err(|e| SettingsError::Parse(e.to_string()))
    }
}

fn write_default_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_FILE)
}
