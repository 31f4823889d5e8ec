//! File-backed preferences store
//!
//! Each suite is one JSON file. Writes go through to disk immediately, using
//! a uniquely named temp file and a rename so a crash never leaves a
//! half-written suite.
//!
//! A write re-reads the file and changes only its own key, holding a lock
//! shared by every handle on that file in the process. Handles opened on the
//! same suite therefore never drop each other's entries. Reads are served from
//! the handle's cache, which is refreshed on every write and by `reload`.

use base64::Engine;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{Preference, PreferenceStore};
use crate::config::PersistConfig;
use crate::error::{PersistError, Result};

/// On-disk representation of a single entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
enum StoredEntry {
    Value(Value),
    /// Base64 encoded bytes
    Data(String),
}

impl From<Preference> for StoredEntry {
    fn from(preference: Preference) -> Self {
        match preference {
            Preference::Value(value) => StoredEntry::Value(value),
            Preference::Data(data) => {
                StoredEntry::Data(base64::engine::general_purpose::STANDARD.encode(data))
            }
        }
    }
}

impl TryFrom<&StoredEntry> for Preference {
    type Error = PersistError;

    fn try_from(entry: &StoredEntry) -> Result<Self> {
        match entry {
            StoredEntry::Value(value) => Ok(Preference::Value(value.clone())),
            StoredEntry::Data(encoded) => base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map(Preference::Data)
                .map_err(|e| PersistError::StorageError(format!("Base64 decode error: {}", e))),
        }
    }
}

/// File format for a preferences suite
#[derive(Debug, Serialize, Deserialize)]
struct PreferenceFile {
    version: u32,
    entries: BTreeMap<String, StoredEntry>,
}

/// Lock serializing writes to `path` across every handle in the process
fn file_lock(path: &Path) -> Arc<Mutex<()>> {
    static LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

    let key = path
        .parent()
        .and_then(|dir| std::fs::canonicalize(dir).ok())
        .zip(path.file_name())
        .map(|(dir, name)| dir.join(name))
        .unwrap_or_else(|| path.to_path_buf());

    LOCKS
        .get_or_init(Default::default)
        .lock()
        .entry(key)
        .or_default()
        .clone()
}

/// JSON file preferences store
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, StoredEntry>>,
    file_lock: Arc<Mutex<()>>,
}

impl FilePreferenceStore {
    /// Open the suite `{dir}/{suite}.json`, creating `dir` if needed
    pub fn open(dir: &Path, suite: &str) -> Result<Self> {
        Self::with_path(dir.join(format!("{}.json", suite)))
    }

    /// Open a suite stored at an explicit path
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let entries = Self::read_file(&path)?;
        debug!(
            "Preferences store initialized at {:?} with {} entries",
            path,
            entries.len()
        );

        Ok(Self {
            file_lock: file_lock(&path),
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Open the store described by `config`
    pub fn from_config(config: &PersistConfig) -> Result<Self> {
        config.validate()?;
        Self::with_path(config.preferences_file()?)
    }

    /// Open the default suite in the platform config directory
    pub fn standard() -> Result<Self> {
        Self::from_config(&PersistConfig::default())
    }

    fn read_file(path: &Path) -> Result<BTreeMap<String, StoredEntry>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let file: PreferenceFile = serde_json::from_str(&contents)?;
        Ok(file.entries)
    }

    fn write_file(&self, entries: &BTreeMap<String, StoredEntry>) -> Result<()> {
        let file = PreferenceFile {
            version: 1,
            entries: entries.clone(),
        };
        let contents = serde_json::to_string_pretty(&file)?;

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(contents.as_bytes())?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }

    /// Replace the in-memory view with the current file contents
    pub fn reload(&self) -> Result<()> {
        let entries = Self::read_file(&self.path)?;
        let mut cached = self.entries.write();
        *cached = entries;
        debug!("Reloaded {} preferences from {:?}", cached.len(), self.path);
        Ok(())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to the current file contents and persist them
    ///
    /// The cache is only replaced once the file has been written.
    fn update(&self, key: &str, change: Option<StoredEntry>) -> Result<()> {
        let _file = self.file_lock.lock();
        let mut entries = Self::read_file(&self.path)?;

        let changed = match change {
            Some(entry) => {
                entries.insert(key.to_string(), entry);
                true
            }
            None => entries.remove(key).is_some(),
        };

        if changed {
            if let Err(e) = self.write_file(&entries) {
                warn!("Failed to persist preference {}: {}", key, e);
                return Err(e);
            }
        }

        *self.entries.write() = entries;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<Preference>> {
        self.entries
            .read()
            .get(key)
            .map(Preference::try_from)
            .transpose()
    }

    fn set(&self, key: &str, value: Preference) -> Result<()> {
        self.update(key, Some(value.into()))?;
        debug!("Stored preference: {}", key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(key, None)?;
        debug!("Removed preference: {}", key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }

    fn backend_name(&self) -> &'static str {
        "JSON Preferences File"
    }
}
