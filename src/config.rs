//! Configuration handling for form sessions

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::form::{DefaultMessages, MessageLookup};

const DEFAULT_ERROR_AUTO_CLOSE_MS: u64 = 5000;
const DEFAULT_INFO_AUTO_CLOSE_MS: u64 = 4000;
const DEFAULT_SUMMARY_AUTO_CLOSE_MS: u64 = 6000;
const DEFAULT_SUCCESS_AUTO_CLOSE_MS: u64 = 2500;

/// User configuration for form sessions
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FormConfig {
    /// Message key for the title of error notifications
    pub error_title_key: Option<String>,
    /// Auto-close delay for field error notifications
    pub error_auto_close_ms: Option<u64>,
    /// Auto-close delay for informational notices
    pub info_auto_close_ms: Option<u64>,
    /// Auto-close delay for the "fix the highlighted fields" summary
    pub summary_auto_close_ms: Option<u64>,
    /// Auto-close delay for the "submitted" confirmation
    pub success_auto_close_ms: Option<u64>,
    /// Message overrides, consulted before the built-in catalog
    #[serde(default)]
    pub messages: HashMap<String, String>,
}

impl FormConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("ch", "pax", "pax-form").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the platform config directory
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`, defaulting when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: FormConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn error_title_key(&self) -> &str {
        self.error_title_key.as_deref().unwrap_or("errors.title")
    }

    pub fn error_auto_close(&self) -> Duration {
        Duration::from_millis(self.error_auto_close_ms.unwrap_or(DEFAULT_ERROR_AUTO_CLOSE_MS))
    }

    pub fn info_auto_close(&self) -> Duration {
        Duration::from_millis(self.info_auto_close_ms.unwrap_or(DEFAULT_INFO_AUTO_CLOSE_MS))
    }

    pub fn summary_auto_close(&self) -> Duration {
        Duration::from_millis(
            self.summary_auto_close_ms
                .unwrap_or(DEFAULT_SUMMARY_AUTO_CLOSE_MS),
        )
    }

    pub fn success_auto_close(&self) -> Duration {
        Duration::from_millis(
            self.success_auto_close_ms
                .unwrap_or(DEFAULT_SUCCESS_AUTO_CLOSE_MS),
        )
    }
}

impl MessageLookup for FormConfig {
    fn lookup(&self, key: &str) -> String {
        match self.messages.get(key) {
            Some(text) => text.clone(),
            None => DefaultMessages.lookup(key),
        }
    }
}
