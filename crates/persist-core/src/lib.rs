//! # persist-core
//!
//! Typed accessors over two kinds of key-value stores:
//! - Secure stores (OS keychain, in-memory) with per-entry accessibility
//! - Preferences stores (JSON file, in-memory) with native values or bytes
//!
//! Every accessor has a fixed key and default value. Reads never fail: absent
//! or undecodable entries yield the default. Writes report a [`WriteOutcome`]
//! and remove stale data when the new value cannot be encoded.

pub mod accessibility;
pub mod accessor;
pub mod codec;
pub mod config;
pub mod error;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_utils;

pub use accessibility::Accessibility;
pub use accessor::{CodablePreference, PreferenceValue, SecureCodable, SecureValue, WriteOutcome};
pub use codec::{Archiver, Decoder, Encoder, JsonDecoder, JsonEncoder};
pub use config::PersistConfig;
pub use error::{PersistError, Result};
pub use storage::{
    FilePreferenceStore, KeychainStore, MemoryPreferenceStore, MemorySecureStore, Preference,
    PreferenceStore, SecureStore,
};
