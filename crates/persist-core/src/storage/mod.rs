//! Storage backends behind the accessors
//!
//! This module provides the two backend contracts and their bundled
//! implementations:
//! 1. Secure stores: OS keychain, in-memory
//! 2. Preferences stores: JSON file, in-memory

mod keychain;
mod memory;
mod preferences_file;
mod traits;

pub use keychain::{KeychainStore, DEFAULT_SERVICE_NAME};
pub use memory::{MemoryPreferenceStore, MemorySecureStore};
pub use preferences_file::FilePreferenceStore;
pub use traits::{Preference, PreferenceStore, SecureStore};
