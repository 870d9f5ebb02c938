//! Configuration management for grit.
//!
//! Settings live in `config.json` inside the platform data directory (see
//! [`DataStorage`]). A missing file means defaults everywhere, and every
//! section is optional so a partial file stays valid.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use grit::libs::config::Config;
//!
//! let config = Config::read()?;
//! let reminders = config.reminders.clone().unwrap_or_default();
//! println!("reminders enabled: {}", reminders.enabled);
//!
//! let updated = Config::init()?;
//! updated.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const WIDGET_FILE_NAME: &str = "widget.json";

/// Deadline reminder settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReminderConfig {
    /// Whether notifications may be scheduled at all. When `false`, scheduling
    /// a reminder fails the same way a denied notification permission would.
    pub enabled: bool,

    /// Minutes before the deadline at which the reminder fires.
    pub lead_minutes: u64,
}

/// At-a-glance widget snapshot settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WidgetConfig {
    /// Where the JSON snapshot is written. Defaults to `widget.json` in the
    /// data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Pending tasks listed per category.
    pub max_tasks: usize,
}

/// Background `watch` process settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DaemonConfig {
    /// Milliseconds between checks for due reminders and external changes.
    pub poll_interval: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminders: Option<ReminderConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<WidgetConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub daemon: Option<DaemonConfig>,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        ReminderConfig {
            enabled: true,
            lead_minutes: 0,
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        WidgetConfig { path: None, max_tasks: 5 }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        DaemonConfig { poll_interval: 1000 }
    }
}

impl WidgetConfig {
    /// Configured snapshot path, or the default one in the data directory.
    pub fn resolve_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(DataStorage::new().get_path(WIDGET_FILE_NAME)?),
        }
    }
}

impl Config {
    /// Loads the configuration, falling back to defaults when no file exists.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Interactive setup wizard for the selected sections.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let sections = [Message::ConfigModuleReminders, Message::ConfigModuleWidget, Message::ConfigModuleDaemon];
        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&sections.iter().map(|section| section.to_string()).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            msg_print!(sections[selection]);
            match selection {
                0 => {
                    let default = config.reminders.clone().unwrap_or_default();
                    config.reminders = Some(ReminderConfig {
                        enabled: Confirm::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptRemindersEnabled.to_string())
                            .default(default.enabled)
                            .interact()?,
                        lead_minutes: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptLeadMinutes.to_string())
                            .default(default.lead_minutes)
                            .interact_text()?,
                    });
                }
                1 => {
                    let default = config.widget.clone().unwrap_or_default();
                    let path: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptWidgetPath.to_string())
                        .default(default.path.map(|p| p.display().to_string()).unwrap_or_default())
                        .allow_empty(true)
                        .interact_text()?;
                    config.widget = Some(WidgetConfig {
                        path: if path.trim().is_empty() { None } else { Some(PathBuf::from(path.trim())) },
                        max_tasks: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptWidgetMaxTasks.to_string())
                            .default(default.max_tasks)
                            .interact_text()?,
                    });
                }
                2 => {
                    let default = config.daemon.clone().unwrap_or_default();
                    config.daemon = Some(DaemonConfig {
                        poll_interval: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptPollInterval.to_string())
                            .default(default.poll_interval)
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
