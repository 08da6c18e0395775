//! # Application Configuration
//!
//! Settings are read from a single YAML file. Every field has a default, so a
//! missing file (first run) or a partial file is fine:
//!
//! ```yaml
//! data_directory: "/home/me/.local/share/Tilly"
//! trial_days: 5
//! default_sleep_minutes: 60
//! persist_empty_collections: false
//! tracker_tick_millis: 1000
//! log_level: "info"
//! ```

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.yaml";
const DATA_DIRECTORY_NAME: &str = "Tilly";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the JSON files live. Falls back to the platform data directory.
    pub data_directory: Option<PathBuf>,
    /// Length of the free trial started on first run
    pub trial_days: i64,
    /// Sleep length used when neither a duration nor times are entered
    pub default_sleep_minutes: u32,
    /// Write `[]` when a collection becomes empty. Off by default, which keeps
    /// the last non-empty snapshot on disk after deleting every record.
    pub persist_empty_collections: bool,
    /// How often a running tracker recomputes its elapsed minutes
    pub tracker_tick_millis: u64,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: None,
            trial_days: 5,
            default_sleep_minutes: 60,
            persist_empty_collections: false,
            tracker_tick_millis: 1000,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load the configuration file, or defaults if it does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Write the configuration as YAML, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml).with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// The configured data directory, or `<platform data dir>/Tilly`
    pub fn resolve_data_directory(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_directory {
            return Ok(dir.clone());
        }
        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("Could not determine a data directory"))?;
        Ok(base.join(DATA_DIRECTORY_NAME))
    }

    pub fn tracker_tick(&self) -> Duration {
        Duration::from_millis(self.tracker_tick_millis.max(1))
    }
}
