//! # JSON File Storage
//!
//! File-backed key-value storage: each key is one JSON file in the data
//! directory.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── babyProfile.json
//! ├── subscription.json
//! ├── feedingRecords.json
//! ├── sleepRecords.json
//! ├── growthRecords.json
//! ├── observations.json
//! └── medicines.json
//! ```
//!
//! Writes go to a temp file first and are renamed into place, so a crash
//! never leaves a half-written value behind.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::traits::KeyValueStorage;

const VALUE_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    base_directory: PathBuf,
}

impl JsonFileStorage {
    /// Open (and create if needed) a storage directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of the file holding `key`. Keys are restricted to ASCII
    /// alphanumerics so they can never escape the data directory.
    fn value_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(anyhow::anyhow!("Invalid storage key: '{}'", key));
        }
        Ok(self.base_directory.join(format!("{}.{}", key, VALUE_EXTENSION)))
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.value_path(key)?;
        let temp_path = path.with_extension("tmp");

        fs::write(&temp_path, value).with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path).with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Saved {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let path = self.value_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}
