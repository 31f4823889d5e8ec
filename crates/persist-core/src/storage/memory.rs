//! In-memory storage backends
//!
//! Nothing here survives the process. Useful for tests, previews and
//! ephemeral sessions that still want the accessor contract.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use zeroize::Zeroizing;

use super::{Preference, PreferenceStore, SecureStore};
use crate::accessibility::Accessibility;
use crate::error::Result;

type SecureKey = (Option<Accessibility>, String);

/// In-memory secure store
///
/// Stored bytes are wiped when they are overwritten, removed, or when the
/// store is dropped.
#[derive(Default)]
pub struct MemorySecureStore {
    entries: RwLock<HashMap<SecureKey, Zeroizing<Vec<u8>>>>,
}

impl MemorySecureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries across all accessibility levels
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.entries.write().clear();
        debug!("Cleared in-memory secure store");
    }
}

impl SecureStore for MemorySecureStore {
    fn data(&self, key: &str, accessibility: Option<Accessibility>) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read();
        Ok(entries
            .get(&(accessibility, key.to_string()))
            .map(|value| value.to_vec()))
    }

    fn set(&self, key: &str, value: &[u8], accessibility: Option<Accessibility>) -> Result<()> {
        self.entries
            .write()
            .insert((accessibility, key.to_string()), Zeroizing::new(value.to_vec()));
        debug!("Stored key in memory: {}", key);
        Ok(())
    }

    fn remove(&self, key: &str, accessibility: Option<Accessibility>) -> Result<()> {
        if self
            .entries
            .write()
            .remove(&(accessibility, key.to_string()))
            .is_some()
        {
            debug!("Removed key from memory: {}", key);
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "In-Memory Secure Store"
    }
}

/// In-memory preferences store
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: RwLock<HashMap<String, Preference>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<Preference>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: Preference) -> Result<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn backend_name(&self) -> &'static str {
        "In-Memory Preferences"
    }
}
