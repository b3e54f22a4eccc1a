//! Flat key-value preference store

use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// A single stored value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum PrefValue {
    Bool(bool),
    Long(i64),
}

/// A flat snapshot of key-value preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences {
    entries: BTreeMap<String, PrefValue>,
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a long value, falling back to `default` when missing or of another type
    pub fn get_long(&self, key: &str, default: i64) -> i64 {
        match self.entries.get(key) {
            Some(PrefValue::Long(value)) => *value,
            _ => default,
        }
    }

    /// Read a bool value, falling back to `default` when missing or of another type
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.entries.get(key) {
            Some(PrefValue::Bool(value)) => *value,
            _ => default,
        }
    }

    pub fn put_long(&mut self, key: &str, value: i64) {
        self.entries.insert(key.to_string(), PrefValue::Long(value));
    }

    pub fn put_bool(&mut self, key: &str, value: bool) {
        self.entries.insert(key.to_string(), PrefValue::Bool(value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Durable storage for the preference snapshot
pub trait PreferenceStore: Debug + Send + Sync {
    /// Load the last saved snapshot; an empty snapshot when nothing was saved yet
    fn load(&self) -> Result<Preferences>;

    /// Replace the stored snapshot
    fn save(&self, prefs: &Preferences) -> Result<()>;
}

/// Preferences kept as a pretty-printed JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the platform data directory
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("countdown-timer")
            .join("prefs.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            debug!("No preference file at {}, using defaults", self.path.display());
            return Ok(Preferences::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read preferences from {}", self.path.display()))?;
        let prefs = serde_json::from_str(&data).with_context(|| {
            format!("failed to deserialize preferences from {}", self.path.display())
        })?;
        debug!("Preferences loaded from {}", self.path.display());
        Ok(prefs)
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create dir {}", parent.display()))?;

        // write beside the target and rename over it, so a crash never leaves half a file
        let data = serde_json::to_string_pretty(prefs)?;
        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
        tmp.write_all(data.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .with_context(|| format!("failed to write preferences to {}", tmp.path().display()))?;
        tmp.persist(&self.path)
            .with_context(|| format!("failed to write preferences to {}", self.path.display()))?;
        info!("Preferences saved to {}", self.path.display());
        Ok(())
    }
}

/// Preferences that live only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    prefs: Mutex<Preferences>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferences(prefs: Preferences) -> Self {
        Self {
            prefs: Mutex::new(prefs),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Result<Preferences> {
        self.prefs
            .lock()
            .map(|prefs| prefs.clone())
            .map_err(|e| anyhow!("Failed to lock preferences: {}", e))
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        let mut stored = self
            .prefs
            .lock()
            .map_err(|e| anyhow!("Failed to lock preferences: {}", e))?;
        *stored = prefs.clone();
        Ok(())
    }
}
