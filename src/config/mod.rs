//! Editor settings.
//!
//! # Module Structure
//!
//! - `loader`: settings file location and JSON (de)serialization
//!
//! # Settings Management
//!
//! `SettingsManager` persists `EditorSettings` as pretty JSON, by default to
//! `~/.config/xccdf-tailor/settings.json`. A missing or unreadable file is
//! never fatal: the editor starts with defaults.

pub mod loader;

use crate::error::ConfigError;
use crate::models::DEFAULT_LANGUAGE;
use std::path::Path;

/// User-tunable editor behaviour
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Language for preferred-text reads and profile text edits
    pub default_language: String,
    pub expand_all_on_open: bool,
    pub show_undo_history: bool,

    // Window
    pub window_width: f32,
    pub window_height: f32,

    // Debug Settings
    pub debug_logging: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        EditorSettings {
            default_language: DEFAULT_LANGUAGE.to_string(),
            expand_all_on_open: true,
            show_undo_history: false,
            window_width: 1000.0,
            window_height: 700.0,
            debug_logging: false,
        }
    }
}

pub struct SettingsManager;

impl SettingsManager {
    /// Load settings from the global settings path, or defaults.
    pub fn load() -> Result<EditorSettings, ConfigError> {
        let path = loader::get_global_settings_path()?;
        Self::load_from(&path)
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields defaults. A file that fails to parse is logged
    /// and also yields defaults, so a format change never locks the user out.
    pub fn load_from(path: &Path) -> Result<EditorSettings, ConfigError> {
        match loader::load_settings_from_file(path) {
            Ok(settings) => Ok(sanitize(settings)),
            Err(ConfigError::FileNotFound(_)) => Ok(EditorSettings::default()),
            Err(ConfigError::InvalidJson(e)) => {
                log::warn!(
                    "[Config] Failed to parse {}, falling back to defaults: {}",
                    path.display(),
                    e
                );
                Ok(EditorSettings::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Save settings to the global settings path
    pub fn save(settings: &EditorSettings) -> Result<(), ConfigError> {
        loader::ensure_settings_dir_exists()?;
        let path = loader::get_global_settings_path()?;
        Self::save_to(settings, &path)
    }

    pub fn save_to(settings: &EditorSettings, path: &Path) -> Result<(), ConfigError> {
        loader::save_settings_to_file(settings, path)
    }
}

/// Replace values the editor cannot work with by their defaults.
fn sanitize(mut settings: EditorSettings) -> EditorSettings {
    let defaults = EditorSettings::default();
    if settings.default_language.trim().is_empty() {
        log::warn!("[Config] Empty default_language, using {}", defaults.default_language);
        settings.default_language = defaults.default_language;
    }
    if !(settings.window_width > 0.0 && settings.window_height > 0.0) {
        settings.window_width = defaults.window_width;
        settings.window_height = defaults.window_height;
    }
    settings
}
