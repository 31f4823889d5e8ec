//! OS Keychain storage backend
//!
//! Uses the system keychain for secure storage:
//! - macOS: Keychain
//! - Windows: Credential Manager (DPAPI)
//! - Linux: Secret Service (GNOME Keyring, KWallet)

use keyring::Entry;
use tracing::{debug, warn};

use super::SecureStore;
use crate::accessibility::Accessibility;
use crate::config::PersistConfig;
use crate::error::{PersistError, Result};

/// Default service name used for keychain entries
pub const DEFAULT_SERVICE_NAME: &str = "persist-kit";

/// OS Keychain storage backend
pub struct KeychainStore {
    /// Service the entries are filed under
    service: String,
    /// Prefix for all keys (for namespacing)
    prefix: String,
    /// Whether keychain is available
    available: bool,
}

impl KeychainStore {
    /// Create a keychain store for `service` with an optional key prefix
    pub fn new(service: impl Into<String>, prefix: Option<&str>) -> Self {
        let service = service.into();
        let prefix = prefix.map(|p| format!("{}-", p)).unwrap_or_default();

        let available = Self::test_availability(&service);

        if available {
            debug!("Keychain storage is available for service {}", service);
        } else {
            warn!("Keychain storage is not available for service {}", service);
        }

        Self {
            service,
            prefix,
            available,
        }
    }

    /// Create a keychain store from configuration
    pub fn from_config(config: &PersistConfig) -> Self {
        Self::new(config.service_name.clone(), config.key_prefix.as_deref())
    }

    /// Test if the keychain is available
    fn test_availability(service: &str) -> bool {
        match Entry::new(service, "__test_availability__") {
            Ok(entry) => {
                // Try to set and delete a test value
                if entry.set_password("test").is_ok() {
                    let _ = entry.delete_password();
                    true
                } else {
                    false
                }
            }
            Err(_) => false,
        }
    }

    /// Keychain service for an accessibility level
    ///
    /// Each level gets its own service so a lookup only sees entries written
    /// with the same descriptor.
    pub fn service_for(&self, accessibility: Option<Accessibility>) -> String {
        match accessibility {
            Some(accessibility) => format!("{}.{}", self.service, accessibility),
            None => self.service.clone(),
        }
    }

    /// Get a keyring entry for a key
    fn get_entry(&self, key: &str, accessibility: Option<Accessibility>) -> Result<Entry> {
        let full_key = format!("{}{}", self.prefix, key);
        Entry::new(&self.service_for(accessibility), &full_key)
            .map_err(|e| PersistError::KeychainError(e.to_string()))
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(PersistError::KeychainError(
                "Keychain not available".to_string(),
            ))
        }
    }

    /// Check if keychain is available
    pub fn is_available(&self) -> bool {
        self.available
    }
}

impl SecureStore for KeychainStore {
    fn data(&self, key: &str, accessibility: Option<Accessibility>) -> Result<Option<Vec<u8>>> {
        self.ensure_available()?;

        let entry = self.get_entry(key, accessibility)?;

        match entry.get_password() {
            Ok(encoded) => {
                let decoded = base64_decode(&encoded)?;
                debug!("Retrieved key from keychain: {}", key);
                Ok(Some(decoded))
            }
            Err(keyring::Error::NoEntry) => {
                debug!("Key not found in keychain: {}", key);
                Ok(None)
            }
            Err(e) => Err(PersistError::KeychainError(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &[u8], accessibility: Option<Accessibility>) -> Result<()> {
        self.ensure_available()?;

        let entry = self.get_entry(key, accessibility)?;

        // Keychain entries hold strings
        let encoded = base64_encode(value);

        entry
            .set_password(&encoded)
            .map_err(|e| PersistError::KeychainError(e.to_string()))?;

        debug!("Stored key in keychain: {}", key);
        Ok(())
    }

    fn remove(&self, key: &str, accessibility: Option<Accessibility>) -> Result<()> {
        self.ensure_available()?;

        let entry = self.get_entry(key, accessibility)?;

        match entry.delete_password() {
            Ok(()) => {
                debug!("Deleted key from keychain: {}", key);
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(PersistError::KeychainError(e.to_string())),
        }
    }

    fn backend_name(&self) -> &'static str {
        #[cfg(target_os = "macos")]
        return "macOS Keychain";

        #[cfg(target_os = "windows")]
        return "Windows Credential Manager";

        #[cfg(target_os = "linux")]
        return "Linux Secret Service";

        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        return "System Keychain";
    }
}

/// Base64 encode bytes
fn base64_encode(data: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Base64 decode string
fn base64_decode(encoded: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| PersistError::StorageError(format!("Base64 decode error: {}", e)))
}
