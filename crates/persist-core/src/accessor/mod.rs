//! Typed accessors over the backing stores
//!
//! All four accessors follow the same pipeline: serialize, persist, later
//! retrieve, deserialize. Any failing stage degrades to the accessor's
//! default instead of raising. Decode failures are silent; encode failures
//! also remove the stale entry so the default shows through on the next read.
//!
//! Each accessor offers two APIs:
//! - `get` / `set`: never fail, return the default or a [`WriteOutcome`]
//! - `try_get` / `try_set` / `remove`: return [`Result`] for explicit handling

mod absence;
mod outcome;
mod preference;
mod secure;

pub use outcome::WriteOutcome;
pub use preference::{CodablePreference, PreferenceValue};
pub use secure::{SecureCodable, SecureValue};

use tracing::{debug, warn};

use crate::error::Result;

/// Collapse a strict read into the stored value or the default
fn or_default<T: Clone>(key: &str, read: Result<Option<T>>, default_value: &T) -> T {
    match read {
        Ok(Some(value)) => value,
        Ok(None) => default_value.clone(),
        Err(e) => {
            debug!("Using default for {}: {}", key, e);
            default_value.clone()
        }
    }
}

/// Persist an encoded value, or remove the entry if encoding failed
fn write_or_clear<P>(
    key: &str,
    encoded: Result<P>,
    persist: impl FnOnce(P) -> Result<()>,
    clear: impl FnOnce() -> Result<()>,
) -> WriteOutcome {
    match encoded {
        Ok(payload) => match persist(payload) {
            Ok(()) => WriteOutcome::Saved,
            Err(e) => {
                warn!("Failed to store {}: {}", key, e);
                WriteOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        },
        Err(encode_err) => {
            warn!("Failed to encode {}, removing stale entry: {}", key, encode_err);
            match clear() {
                Ok(()) => WriteOutcome::Cleared {
                    reason: encode_err.to_string(),
                },
                Err(e) => {
                    warn!("Failed to remove {}: {}", key, e);
                    WriteOutcome::Failed {
                        reason: format!("{}; removing stale entry failed: {}", encode_err, e),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistError;
    use std::cell::Cell;

    #[test]
    fn test_or_default() {
        assert_eq!(or_default("k", Ok(Some(5)), &1), 5);
        assert_eq!(or_default("k", Ok(None), &1), 1);
        assert_eq!(
            or_default("k", Err(PersistError::DecodingError("bad".into())), &1),
            1
        );
    }

    #[test]
    fn test_write_or_clear_skips_clear_on_success() {
        let cleared = Cell::new(false);

        let outcome = write_or_clear(
            "k",
            Ok(vec![1u8]),
            |_| Ok(()),
            || {
                cleared.set(true);
                Ok(())
            },
        );

        assert_eq!(outcome, WriteOutcome::Saved);
        assert!(!cleared.get());
    }

    #[test]
    fn test_write_or_clear_clears_on_encode_failure() {
        let persisted = Cell::new(false);

        let outcome = write_or_clear(
            "k",
            Err::<Vec<u8>, _>(PersistError::EncodingError("bad".into())),
            |_| {
                persisted.set(true);
                Ok(())
            },
            || Ok(()),
        );

        assert!(matches!(outcome, WriteOutcome::Cleared { .. }));
        assert!(!persisted.get());
    }

    #[test]
    fn test_write_or_clear_reports_failed_clear() {
        let outcome = write_or_clear(
            "k",
            Err::<Vec<u8>, _>(PersistError::EncodingError("bad".into())),
            |_| Ok(()),
            || Err(PersistError::KeychainError("denied".into())),
        );

        match outcome {
            WriteOutcome::Failed { reason } => {
                assert!(reason.contains("bad"));
                assert!(reason.contains("denied"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
