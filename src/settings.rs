use crate::constants::{DEFAULT_CONTROLLER_NAME, DEFAULT_DISABLED_VALUE, DEFAULT_PLACEHOLDER};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

lazy_static! {
    // Placeholders are substituted in serialized markup: they must survive
    // serialization unescaped and must not collide with attribute names
    // such as `name`
    static ref PLACEHOLDER_PATTERN: Regex = Regex::new(r"^__[A-Za-z0-9_\-]+__$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Token in `data-controller` that marks a collection root
    pub controller: String,
    /// Token replaced with the item identifier in the item template
    pub placeholder: String,
    /// Value written to the `disabled` attribute of remove controls
    pub disabled_value: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            controller: DEFAULT_CONTROLLER_NAME.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            disabled_value: DEFAULT_DISABLED_VALUE.to_string(),
        }
    }
}

impl Settings {
    /// Replace unusable values with their defaults
    pub fn validated(mut self) -> Self {
        let defaults = Settings::default();

        if self.controller.split_whitespace().count() != 1 {
            tracing::warn!(
                "Invalid controller name '{}'. Using '{}'.",
                self.controller,
                defaults.controller
            );
            self.controller = defaults.controller;
        }

        if !PLACEHOLDER_PATTERN.is_match(&self.placeholder) {
            tracing::warn!(
                "Invalid placeholder '{}'. Using '{}'.",
                self.placeholder,
                defaults.placeholder
            );
            self.placeholder = defaults.placeholder;
        }

        self
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        Ok(settings.validated())
    }
}

/// Settings stored in the platform configuration directory
pub struct SettingsStore {
    config_dir: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "formset")
            .context("Failed to determine config directory")?;

        Self::with_dir(project_dirs.config_dir())
    }

    pub fn with_dir(config_dir: &Path) -> Result<Self> {
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).context("Failed to create config directory")?;
        }

        Ok(SettingsStore {
            config_dir: config_dir.to_path_buf(),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    pub fn load(&self) -> Result<Settings> {
        let config_path = self.path();

        if !config_path.exists() {
            let settings = Settings::default();
            self.save(&settings)?;
            return Ok(settings);
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;

        let settings: Settings = serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse config file: {}. Using defaults.", e);
            Settings::default()
        });

        Ok(settings.validated())
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize config")?;

        fs::write(self.path(), content).context("Failed to write config file")?;

        Ok(())
    }
}
