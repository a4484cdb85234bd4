use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_tab_diary")]
    pub tab_diary: String,
    #[serde(default = "default_tab_board")]
    pub tab_board: String,
    #[serde(default = "default_new")]
    pub new: String,
    #[serde(default = "default_edit")]
    pub edit: String,
    #[serde(default = "default_save")]
    pub save: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_select")]
    pub select: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_list_left")]
    pub list_left: String,
    #[serde(default = "default_list_right")]
    pub list_right: String,
    #[serde(default = "default_prev_month")]
    pub prev_month: String,
    #[serde(default = "default_next_month")]
    pub next_month: String,
    #[serde(default = "default_today")]
    pub today: String,
    #[serde(default = "default_grab")]
    pub grab: String,
    #[serde(default = "default_lane_todo")]
    pub lane_todo: String,
    #[serde(default = "default_lane_in_progress")]
    pub lane_in_progress: String,
    #[serde(default = "default_lane_done")]
    pub lane_done: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_dim_fg")]
    pub dim_fg: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            help: default_help(),
            tab_diary: default_tab_diary(),
            tab_board: default_tab_board(),
            new: default_new(),
            edit: default_edit(),
            save: default_save(),
            delete: default_delete(),
            select: default_select(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            list_left: default_list_left(),
            list_right: default_list_right(),
            prev_month: default_prev_month(),
            next_month: default_next_month(),
            today: default_today(),
            grab: default_grab(),
            lane_todo: default_lane_todo(),
            lane_in_progress: default_lane_in_progress(),
            lane_done: default_lane_done(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            dim_fg: default_dim_fg(),
        }
    }
}

impl Theme {
    /// Preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();

        themes.insert(
            "default".to_string(),
            Theme {
                fg: "white".to_string(),
                bg: "black".to_string(),
                highlight_bg: "blue".to_string(),
                highlight_fg: "white".to_string(),
                dim_fg: "darkgray".to_string(),
            },
        );

        themes.insert(
            "light".to_string(),
            Theme {
                fg: "black".to_string(),
                bg: "white".to_string(),
                highlight_bg: "blue".to_string(),
                highlight_fg: "white".to_string(),
                dim_fg: "gray".to_string(),
            },
        );

        themes.insert(
            "green".to_string(),
            Theme {
                fg: "green".to_string(),
                bg: "black".to_string(),
                highlight_bg: "yellow".to_string(),
                highlight_fg: "black".to_string(),
                dim_fg: "darkgray".to_string(),
            },
        );

        themes
    }
}

// Default value functions

fn default_database_path() -> String {
    // Fallback - the actual profile is applied at load time
    if let Some(data_dir) = utils::get_data_dir(utils::Profile::Prod) {
        data_dir.join("mydaily.db").to_string_lossy().to_string()
    } else {
        "~/.local/share/mydaily/mydaily.db".to_string()
    }
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_tab_diary() -> String {
    "1".to_string()
}

fn default_tab_board() -> String {
    "2".to_string()
}

fn default_new() -> String {
    "n".to_string()
}

fn default_edit() -> String {
    "e".to_string()
}

fn default_save() -> String {
    "Ctrl+s".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_select() -> String {
    "Enter".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_list_left() -> String {
    "h".to_string()
}

fn default_list_right() -> String {
    "l".to_string()
}

fn default_prev_month() -> String {
    "[".to_string()
}

fn default_next_month() -> String {
    "]".to_string()
}

fn default_today() -> String {
    "t".to_string()
}

fn default_grab() -> String {
    "Space".to_string()
}

fn default_lane_todo() -> String {
    "t".to_string()
}

fn default_lane_in_progress() -> String {
    "i".to_string()
}

fn default_lane_done() -> String {
    "c".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_dim_fg() -> String {
    "darkgray".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

impl Config {
    /// Load configuration from file, or create default if missing.
    /// Uses the provided profile to determine config and database paths.
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let mut config: Config = toml::from_str(&contents)?;

            // Ensure database path matches profile (in case config was manually edited)
            config.database_path = Self::default_database_path_for_profile(profile);

            Ok(config)
        } else {
            let mut config = Config::default();
            config.database_path = Self::default_database_path_for_profile(profile);
            config.save_with_profile(profile)?;
            Ok(config)
        }
    }

    /// Load configuration using the production profile
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_profile(utils::Profile::Prod)
    }

    /// Save configuration to file
    pub fn save_with_profile(&mut self, profile: utils::Profile) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        let config_path = Self::get_config_path(profile)?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile).ok_or_else(|| {
            ConfigError::ConfigDirError("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("config.toml"))
    }

    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("mydaily.db").to_string_lossy().to_string()
        } else {
            match profile {
                utils::Profile::Dev => "~/.local/share/mydaily-dev/mydaily.db".to_string(),
                utils::Profile::Prod => "~/.local/share/mydaily/mydaily.db".to_string(),
            }
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    /// Get the currently active theme, falling back to the default preset
    /// when the configured name is unknown
    pub fn get_active_theme(&self) -> Theme {
        if let Some(theme) = self.themes.get(&self.current_theme) {
            theme.clone()
        } else if let Some(theme) = Theme::get_preset_themes().get(&self.current_theme) {
            theme.clone()
        } else {
            Theme::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_default_theme() {
        let config = Config::default();
        assert_eq!(config.current_theme, "default");
        assert_eq!(config.config_version, Some(CURRENT_CONFIG_VERSION));
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let mut config = Config::default();
        config.current_theme = "no-such-theme".to_string();
        let theme = config.get_active_theme();
        assert_eq!(theme.fg, default_fg());
    }

    #[test]
    fn user_theme_overrides_preset_lookup() {
        let mut config = Config::default();
        config.themes.insert(
            "custom".to_string(),
            Theme {
                fg: "cyan".to_string(),
                ..Theme::default()
            },
        );
        config.current_theme = "custom".to_string();
        assert_eq!(config.get_active_theme().fg, "cyan");
    }

    #[test]
    fn partial_config_fills_missing_fields_with_defaults() {
        let config: Config = toml::from_str("current_theme = \"green\"").unwrap();
        assert_eq!(config.current_theme, "green");
        assert_eq!(config.key_bindings.quit, "q");
        assert!(!config.database_path.is_empty());
    }
}
