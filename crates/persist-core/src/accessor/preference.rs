//! Accessors backed by a preferences store

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::absence::is_absent;
use super::outcome::{WriteOutcome, WriteTracker};
use super::{or_default, write_or_clear};
use crate::codec::{Decoder, Encoder, JsonDecoder, JsonEncoder};
use crate::error::{PersistError, Result};
use crate::storage::PreferenceStore;

/// Preferences accessor storing `T` as a native value
///
/// A value representing absence, such as `Option::None`, clears the key
/// instead of being stored. Values with no native form (a non-finite float,
/// a map with non-string keys) take the encode-failure path.
///
/// ```
/// use std::sync::Arc;
/// use persist_core::{MemoryPreferenceStore, PreferenceValue, WriteOutcome};
///
/// let prefs = Arc::new(MemoryPreferenceStore::new());
/// let nickname = PreferenceValue::new(prefs, "nickname", None::<String>);
///
/// nickname.set(&Some("ace".to_string()));
/// assert_eq!(nickname.get(), Some("ace".to_string()));
///
/// assert_eq!(nickname.set(&None), WriteOutcome::Removed);
/// assert_eq!(nickname.get(), None);
/// ```
pub struct PreferenceValue<T> {
    key: String,
    default_value: T,
    store: Arc<dyn PreferenceStore>,
    saved: WriteTracker,
}

impl<T> PreferenceValue<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(store: Arc<dyn PreferenceStore>, key: impl Into<String>, default_value: T) -> Self {
        Self {
            key: key.into(),
            default_value,
            store,
            saved: WriteTracker::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    pub fn store(&self) -> &Arc<dyn PreferenceStore> {
        &self.store
    }

    /// Current value, or the default if absent or not convertible to `T`
    pub fn get(&self) -> T {
        or_default(&self.key, self.try_get(), &self.default_value)
    }

    /// Current value; `None` if absent
    pub fn try_get(&self) -> Result<Option<T>> {
        match self.store.value(&self.key)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| PersistError::DecodingError(e.to_string())),
            None => Ok(None),
        }
    }

    /// Store `value`, or clear the key if `value` represents absence
    pub fn set(&self, value: &T) -> WriteOutcome {
        let outcome = if is_absent(value) {
            self.clear_for_absence()
        } else {
            write_or_clear(
                &self.key,
                to_native(value),
                |native| self.store.set_value(&self.key, native),
                || self.store.remove(&self.key),
            )
        };
        self.saved.record_outcome(outcome)
    }

    /// Store `value`, or clear the key if `value` represents absence
    pub fn try_set(&self, value: &T) -> Result<()> {
        let result = if is_absent(value) {
            self.store.remove(&self.key)
        } else {
            to_native(value).and_then(|native| self.store.set_value(&self.key, native))
        };
        self.saved.record(result.is_ok());
        result
    }

    /// Remove the entry; later reads return the default
    pub fn remove(&self) -> Result<()> {
        let result = self.store.remove(&self.key);
        self.saved.record(result.is_ok());
        result
    }

    /// Whether the most recent write succeeded (`true` before any write)
    pub fn is_successfully_saved(&self) -> bool {
        self.saved.get()
    }

    fn clear_for_absence(&self) -> WriteOutcome {
        debug!("Absent value for {}, removing entry", self.key);
        match self.store.remove(&self.key) {
            Ok(()) => WriteOutcome::Removed,
            Err(e) => WriteOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }
}

/// Convert a present value to its native form
///
/// `null` here can only come from a non-finite float, which has no native form.
fn to_native<T: Serialize>(value: &T) -> Result<Value> {
    match serde_json::to_value(value) {
        Ok(Value::Null) => Err(PersistError::EncodingError(
            "Value has no native representation".to_string(),
        )),
        Ok(native) => Ok(native),
        Err(e) => Err(PersistError::EncodingError(e.to_string())),
    }
}

/// Preferences accessor storing `T` as encoded bytes
pub struct CodablePreference<T, E = JsonEncoder, D = JsonDecoder> {
    key: String,
    default_value: T,
    store: Arc<dyn PreferenceStore>,
    encoder: E,
    decoder: D,
    saved: WriteTracker,
}

impl<T> CodablePreference<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Create an accessor using the JSON codec
    pub fn new(store: Arc<dyn PreferenceStore>, key: impl Into<String>, default_value: T) -> Self {
        Self::with_codec(store, key, default_value, JsonEncoder::new(), JsonDecoder::new())
    }
}

impl<T, E, D> CodablePreference<T, E, D>
where
    T: Serialize + DeserializeOwned + Clone,
    E: Encoder,
    D: Decoder,
{
    /// Create an accessor with its own encoder and decoder
    pub fn with_codec(
        store: Arc<dyn PreferenceStore>,
        key: impl Into<String>,
        default_value: T,
        encoder: E,
        decoder: D,
    ) -> Self {
        Self {
            key: key.into(),
            default_value,
            store,
            encoder,
            decoder,
            saved: WriteTracker::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    pub fn store(&self) -> &Arc<dyn PreferenceStore> {
        &self.store
    }

    /// Current value, or the default if absent or undecodable
    pub fn get(&self) -> T {
        or_default(&self.key, self.try_get(), &self.default_value)
    }

    /// Current value; `None` if absent
    pub fn try_get(&self) -> Result<Option<T>> {
        match self.store.data(&self.key)? {
            Some(data) => self.decoder.decode(&data).map(Some),
            None => Ok(None),
        }
    }

    /// Store `value`; if it cannot be encoded, remove the entry instead
    pub fn set(&self, value: &T) -> WriteOutcome {
        let outcome = write_or_clear(
            &self.key,
            self.encoder.encode(value),
            |data| self.store.set_data(&self.key, &data),
            || self.store.remove(&self.key),
        );
        self.saved.record_outcome(outcome)
    }

    /// Store `value`, returning the first encode or store error
    pub fn try_set(&self, value: &T) -> Result<()> {
        let result = self
            .encoder
            .encode(value)
            .and_then(|data| self.store.set_data(&self.key, &data));
        self.saved.record(result.is_ok());
        result
    }

    /// Remove the entry; later reads return the default
    pub fn remove(&self) -> Result<()> {
        let result = self.store.remove(&self.key);
        self.saved.record(result.is_ok());
        result
    }

    /// Whether the most recent write succeeded (`true` before any write)
    pub fn is_successfully_saved(&self) -> bool {
        self.saved.get()
    }
}
