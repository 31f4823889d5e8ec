//! Storage trait definitions

use serde_json::Value;

use crate::accessibility::Accessibility;
use crate::error::Result;

/// Trait for secure (credential-grade) byte stores
///
/// Calls are synchronous and must be atomic per key. The accessibility
/// descriptor is part of the lookup: an entry written with one descriptor is
/// not visible through another.
pub trait SecureStore: Send + Sync {
    /// Read the bytes stored under `key`
    fn data(&self, key: &str, accessibility: Option<Accessibility>) -> Result<Option<Vec<u8>>>;

    /// Store bytes under `key`, replacing any existing entry
    fn set(&self, key: &str, value: &[u8], accessibility: Option<Accessibility>) -> Result<()>;

    /// Remove the entry under `key`. Removing an absent entry succeeds.
    fn remove(&self, key: &str, accessibility: Option<Accessibility>) -> Result<()>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}

/// A value held by a preferences store
#[derive(Debug, Clone, PartialEq)]
pub enum Preference {
    /// Heterogeneous native value (string, number, bool, array, object)
    Value(Value),
    /// Raw bytes, typically produced by a structured encoder
    Data(Vec<u8>),
}

/// Trait for plain process-wide preferences stores
pub trait PreferenceStore: Send + Sync {
    /// Read the entry under `key`
    fn get(&self, key: &str) -> Result<Option<Preference>>;

    /// Store an entry under `key`, replacing any existing one
    fn set(&self, key: &str, value: Preference) -> Result<()>;

    /// Remove the entry under `key`. Removing an absent entry succeeds.
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently set, sorted
    fn keys(&self) -> Result<Vec<String>>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;

    /// Read a native value. Byte entries are not values.
    fn value(&self, key: &str) -> Result<Option<Value>> {
        Ok(match self.get(key)? {
            Some(Preference::Value(value)) => Some(value),
            _ => None,
        })
    }

    /// Read a byte entry. Native values are not bytes.
    fn data(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(match self.get(key)? {
            Some(Preference::Data(data)) => Some(data),
            _ => None,
        })
    }

    fn set_value(&self, key: &str, value: Value) -> Result<()> {
        self.set(key, Preference::Value(value))
    }

    fn set_data(&self, key: &str, data: &[u8]) -> Result<()> {
        self.set(key, Preference::Data(data.to_vec()))
    }
}
