use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::controller::CommitPolicy;

/// Application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Cell editing settings
    #[serde(default)]
    pub editing: EditingConfig,

    /// UI settings
    #[serde(default)]
    pub ui: UiConfig,
}

/// Which report to show and how taskwarrior formats it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReportConfig {
    /// Report shown when none is given on the command line
    #[serde(default = "default_report")]
    pub default_report: String,

    /// Report width in chars, 0 means unlimited
    #[serde(default)]
    pub width: usize,

    /// Task data directory, if not the taskwarrior default
    #[serde(default)]
    pub task_data_dir: Option<PathBuf>,
}

/// Cell editing settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct EditingConfig {
    /// What to do when a cell loses focus with a changed value
    #[serde(default)]
    pub on_change: CommitPolicy,

    /// Disable editing entirely
    #[serde(default)]
    pub read_only: bool,
}

/// UI settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UiConfig {
    /// Show status bar
    #[serde(default = "default_true")]
    pub show_status_bar: bool,

    /// Show toast notifications
    #[serde(default = "default_true")]
    pub show_toasts: bool,

    /// Rows scrolled per mouse wheel step
    #[serde(default = "default_scroll_step")]
    pub scroll_step: usize,
}

fn default_report() -> String {
    "next".to_string()
}
fn default_true() -> bool {
    true
}
fn default_scroll_step() -> usize {
    3
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_report: default_report(),
            width: 0,
            task_data_dir: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_status_bar: default_true(),
            show_toasts: default_true(),
            scroll_step: default_scroll_step(),
        }
    }
}

/// Directory holding the config file and logs
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskcell")
}

/// Configuration manager
pub struct ConfigManager {
    config: Config,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a manager for `config.json` inside `config_dir`
    pub fn new(config_dir: &Path) -> Self {
        Self::with_path(config_dir.join("config.json"))
    }

    /// Create a manager for an explicit config file
    pub fn with_path(config_path: PathBuf) -> Self {
        Self {
            config: Config::default(),
            config_path,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the config; a missing file leaves the defaults in place
    pub fn load(&mut self) -> Result<()> {
        if self.config_path.exists() {
            let config_str = fs::read_to_string(&self.config_path)
                .with_context(|| format!("Failed to read {}", self.config_path.display()))?;
            self.config = serde_json::from_str(&config_str)
                .map_err(|e| anyhow!("Failed to parse config: {}", e))?;
        }

        Ok(())
    }

    /// Save the config, creating its directory when needed
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let config_str = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_path, config_str)?;
        Ok(())
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    pub fn get_config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    /// Update a setting
    pub fn update_setting(&mut self, path: &str, value: serde_json::Value) -> Result<()> {
        match path {
            "report.defaultReport" => {
                self.config.report.default_report = value
                    .as_str()
                    .ok_or_else(|| anyhow!("Expected string"))?
                    .to_string();
            }
            "report.width" => {
                self.config.report.width =
                    value.as_u64().ok_or_else(|| anyhow!("Expected number"))? as usize;
            }
            "editing.onChange" => {
                self.config.editing.on_change = serde_json::from_value(value)
                    .map_err(|e| anyhow!("Expected \"reload\" or \"keep\": {}", e))?;
            }
            "editing.readOnly" => {
                self.config.editing.read_only =
                    value.as_bool().ok_or_else(|| anyhow!("Expected boolean"))?;
            }
            "ui.showStatusBar" => {
                self.config.ui.show_status_bar =
                    value.as_bool().ok_or_else(|| anyhow!("Expected boolean"))?;
            }
            "ui.showToasts" => {
                self.config.ui.show_toasts =
                    value.as_bool().ok_or_else(|| anyhow!("Expected boolean"))?;
            }
            "ui.scrollStep" => {
                self.config.ui.scroll_step =
                    value.as_u64().ok_or_else(|| anyhow!("Expected number"))? as usize;
            }
            _ => return Err(anyhow!("Unsupported setting path: {}", path)),
        }

        Ok(())
    }

    /// Get a setting by path
    pub fn get_setting(&self, path: &str) -> Result<serde_json::Value> {
        match path {
            "report.defaultReport" => Ok(serde_json::json!(self.config.report.default_report)),
            "report.width" => Ok(serde_json::json!(self.config.report.width)),
            "editing.onChange" => Ok(serde_json::to_value(self.config.editing.on_change)?),
            "editing.readOnly" => Ok(serde_json::json!(self.config.editing.read_only)),
            "ui.showStatusBar" => Ok(serde_json::json!(self.config.ui.show_status_bar)),
            "ui.showToasts" => Ok(serde_json::json!(self.config.ui.show_toasts)),
            "ui.scrollStep" => Ok(serde_json::json!(self.config.ui.scroll_step)),
            _ => Err(anyhow!("Unsupported setting path: {}", path)),
        }
    }
}
