//! Accessors backed by a secure store

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use super::outcome::{WriteOutcome, WriteTracker};
use super::{or_default, write_or_clear};
use crate::accessibility::Accessibility;
use crate::codec::{Archiver, Decoder, Encoder, JsonDecoder, JsonEncoder};
use crate::error::Result;
use crate::storage::SecureStore;

/// Secure-store accessor with a caller-supplied codec
///
/// ```
/// use std::sync::Arc;
/// use persist_core::{MemorySecureStore, SecureCodable};
///
/// let store = Arc::new(MemorySecureStore::new());
/// let token = SecureCodable::new(store, "token", String::new());
///
/// assert_eq!(token.get(), "");
/// assert!(token.set(&"abc123".to_string()).is_saved());
/// assert_eq!(token.get(), "abc123");
/// ```
pub struct SecureCodable<T, E = JsonEncoder, D = JsonDecoder> {
    key: String,
    default_value: T,
    accessibility: Option<Accessibility>,
    store: Arc<dyn SecureStore>,
    encoder: E,
    decoder: D,
    saved: WriteTracker,
}

impl<T> SecureCodable<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Create an accessor using the JSON codec
    pub fn new(store: Arc<dyn SecureStore>, key: impl Into<String>, default_value: T) -> Self {
        Self::with_codec(store, key, default_value, JsonEncoder::new(), JsonDecoder::new())
    }
}

impl<T, E, D> SecureCodable<T, E, D>
where
    T: Serialize + DeserializeOwned + Clone,
    E: Encoder,
    D: Decoder,
{
    /// Create an accessor with its own encoder and decoder
    pub fn with_codec(
        store: Arc<dyn SecureStore>,
        key: impl Into<String>,
        default_value: T,
        encoder: E,
        decoder: D,
    ) -> Self {
        Self {
            key: key.into(),
            default_value,
            accessibility: None,
            store,
            encoder,
            decoder,
            saved: WriteTracker::new(),
        }
    }

    /// Pass `accessibility` to every store call of this accessor
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = Some(accessibility);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    pub fn accessibility(&self) -> Option<Accessibility> {
        self.accessibility
    }

    pub fn store(&self) -> &Arc<dyn SecureStore> {
        &self.store
    }

    /// Current value, or the default if absent or undecodable
    pub fn get(&self) -> T {
        or_default(&self.key, self.try_get(), &self.default_value)
    }

    /// Current value; `None` if absent
    pub fn try_get(&self) -> Result<Option<T>> {
        match self.store.data(&self.key, self.accessibility)? {
            Some(data) => self.decoder.decode(&data).map(Some),
            None => Ok(None),
        }
    }

    /// Store `value`; if it cannot be encoded, remove the entry instead
    pub fn set(&self, value: &T) -> WriteOutcome {
        let outcome = write_or_clear(
            &self.key,
            self.encoder.encode(value),
            |data| self.store.set(&self.key, &data, self.accessibility),
            || self.store.remove(&self.key, self.accessibility),
        );
        self.saved.record_outcome(outcome)
    }

    /// Store `value`, returning the first encode or store error
    pub fn try_set(&self, value: &T) -> Result<()> {
        let result = self
            .encoder
            .encode(value)
            .and_then(|data| self.store.set(&self.key, &data, self.accessibility));
        self.saved.record(result.is_ok());
        result
    }

    /// Remove the entry; later reads return the default
    pub fn remove(&self) -> Result<()> {
        let result = self.store.remove(&self.key, self.accessibility);
        self.saved.record(result.is_ok());
        result
    }

    /// Whether the most recent write succeeded (`true` before any write)
    pub fn is_successfully_saved(&self) -> bool {
        self.saved.get()
    }
}

/// Secure-store accessor for any serde type, stored as a native archive
///
/// Bytes are produced by [`Archiver`]; reading bytes archived for another
/// type yields the default.
pub struct SecureValue<T> {
    inner: SecureCodable<T, Archiver, Archiver>,
}

impl<T> SecureValue<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(store: Arc<dyn SecureStore>, key: impl Into<String>, default_value: T) -> Self {
        Self {
            inner: SecureCodable::with_codec(store, key, default_value, Archiver, Archiver),
        }
    }

    /// Pass `accessibility` to every store call of this accessor
    pub fn with_accessibility(self, accessibility: Accessibility) -> Self {
        Self {
            inner: self.inner.with_accessibility(accessibility),
        }
    }

    pub fn key(&self) -> &str {
        self.inner.key()
    }

    pub fn default_value(&self) -> &T {
        self.inner.default_value()
    }

    pub fn accessibility(&self) -> Option<Accessibility> {
        self.inner.accessibility()
    }

    pub fn store(&self) -> &Arc<dyn SecureStore> {
        self.inner.store()
    }

    /// Current value, or the default if absent or not an archive of `T`
    pub fn get(&self) -> T {
        self.inner.get()
    }

    pub fn try_get(&self) -> Result<Option<T>> {
        self.inner.try_get()
    }

    /// Archive and store `value`; if archiving fails, remove the entry instead
    pub fn set(&self, value: &T) -> WriteOutcome {
        self.inner.set(value)
    }

    pub fn try_set(&self, value: &T) -> Result<()> {
        self.inner.try_set(value)
    }

    pub fn remove(&self) -> Result<()> {
        self.inner.remove()
    }

    pub fn is_successfully_saved(&self) -> bool {
        self.inner.is_successfully_saved()
    }
}
