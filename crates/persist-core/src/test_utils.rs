//! Test helpers: recording and failing stores, and a value that refuses to serialize.

use parking_lot::Mutex;
use serde::{ser::Error as _, Deserialize, Serialize, Serializer};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::accessibility::Accessibility;
use crate::error::{PersistError, Result};
use crate::storage::{
    MemoryPreferenceStore, MemorySecureStore, Preference, PreferenceStore, SecureStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Data,
    Set,
    Remove,
}

/// Secure store that records every call and can reject writes
#[derive(Default)]
pub struct RecordingSecureStore {
    inner: MemorySecureStore,
    calls: Mutex<Vec<(Op, String, Option<Accessibility>)>>,
    /// When set, `set` fails like a denied keychain write
    reject_sets: AtomicBool,
    reject_removes: AtomicBool,
}

impl RecordingSecureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_sets(&self, reject: bool) {
        self.reject_sets.store(reject, Ordering::SeqCst);
    }

    pub fn reject_removes(&self, reject: bool) {
        self.reject_removes.store(reject, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<(Op, String, Option<Accessibility>)> {
        self.calls.lock().clone()
    }

    /// Write bytes directly, bypassing the recorder
    pub fn put_raw(&self, key: &str, data: &[u8], accessibility: Option<Accessibility>) {
        self.inner.set(key, data, accessibility).unwrap();
    }

    pub fn raw(&self, key: &str, accessibility: Option<Accessibility>) -> Option<Vec<u8>> {
        self.inner.data(key, accessibility).unwrap()
    }

    fn record(&self, op: Op, key: &str, accessibility: Option<Accessibility>) {
        self.calls.lock().push((op, key.to_string(), accessibility));
    }
}

impl SecureStore for RecordingSecureStore {
    fn data(&self, key: &str, accessibility: Option<Accessibility>) -> Result<Option<Vec<u8>>> {
        self.record(Op::Data, key, accessibility);
        self.inner.data(key, accessibility)
    }

    fn set(&self, key: &str, value: &[u8], accessibility: Option<Accessibility>) -> Result<()> {
        self.record(Op::Set, key, accessibility);
        if self.reject_sets.load(Ordering::SeqCst) {
            return Err(PersistError::KeychainError("write denied".to_string()));
        }
        self.inner.set(key, value, accessibility)
    }

    fn remove(&self, key: &str, accessibility: Option<Accessibility>) -> Result<()> {
        self.record(Op::Remove, key, accessibility);
        if self.reject_removes.load(Ordering::SeqCst) {
            return Err(PersistError::KeychainError("remove denied".to_string()));
        }
        self.inner.remove(key, accessibility)
    }

    fn backend_name(&self) -> &'static str {
        "Recording Secure Store"
    }
}

/// Preferences store that can reject writes and removals
#[derive(Debug, Default)]
pub struct FailingPreferenceStore {
    inner: MemoryPreferenceStore,
    reject_sets: AtomicBool,
    reject_removes: AtomicBool,
}

impl FailingPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_sets(&self, reject: bool) {
        self.reject_sets.store(reject, Ordering::SeqCst);
    }

    pub fn reject_removes(&self, reject: bool) {
        self.reject_removes.store(reject, Ordering::SeqCst);
    }
}

impl PreferenceStore for FailingPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<Preference>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: Preference) -> Result<()> {
        if self.reject_sets.load(Ordering::SeqCst) {
            return Err(PersistError::StorageError("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.reject_removes.load(Ordering::SeqCst) {
            return Err(PersistError::StorageError("read-only".to_string()));
        }
        self.inner.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys()
    }

    fn backend_name(&self) -> &'static str {
        "Failing Preferences"
    }
}

/// Value whose serialization fails when `poisoned` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub text: String,
    #[serde(serialize_with = "reject_poisoned")]
    pub poisoned: bool,
}

impl Payload {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            poisoned: false,
        }
    }

    pub fn poisoned() -> Self {
        Self {
            text: "poisoned".to_string(),
            poisoned: true,
        }
    }
}

fn reject_poisoned<S: Serializer>(
    poisoned: &bool,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    if *poisoned {
        return Err(S::Error::custom("poisoned payload"));
    }
    serializer.serialize_bool(false)
}
