//! Configuration management for studytrack

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Global studytrack configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// How often the live reporter prints statistics (milliseconds)
    #[serde(default = "default_report_interval_ms")]
    pub report_interval_ms: u64,

    /// Activity label used when a distraction event does not name one
    #[serde(default = "default_activity")]
    pub default_activity: String,

    /// Severity used when a distraction event does not carry one
    #[serde(default = "default_severity")]
    pub default_severity: f64,

    /// Log filter applied when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_report_interval_ms() -> u64 {
    1000
}

fn default_activity() -> String {
    "unknown".to_string()
}

fn default_severity() -> f64 {
    0.5
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_interval_ms: default_report_interval_ms(),
            default_activity: default_activity(),
            default_severity: default_severity(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }
}
