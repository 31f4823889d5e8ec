//! Command execution
//!
//! Values go through the same accessors applications use, so the CLI sees
//! exactly what an application would see (including default fallback).

use persist_core::{Accessibility, PreferenceStore, PreferenceValue, SecureCodable, SecureStore};
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

use crate::cli::{PrefsCommand, SecretCommand};
use crate::error::{CliError, CliResult};

/// Run a preferences command, writing human output to `out`
pub fn run_prefs(
    store: Arc<dyn PreferenceStore>,
    command: PrefsCommand,
    out: &mut impl Write,
) -> CliResult<()> {
    match command {
        PrefsCommand::Get { key } => {
            let preference = PreferenceValue::new(store.clone(), key.as_str(), Value::Null);

            if let Some(value) = preference.try_get()? {
                writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
            } else if let Some(data) = store.data(&key)? {
                writeln!(out, "<{} bytes> {}", data.len(), String::from_utf8_lossy(&data))?;
            } else {
                return Err(CliError::NotFound(key));
            }
        }

        PrefsCommand::Set { key, value } => {
            let value = parse_value(&value);
            let preference = PreferenceValue::new(store, key.as_str(), Value::Null);

            let outcome = preference.set(&value);
            if !outcome.is_success() {
                return Err(CliError::WriteFailed { key, outcome });
            }
            info!("Preference {} {}", key, outcome);
            writeln!(out, "{}", outcome)?;
        }

        PrefsCommand::Remove { key } => {
            PreferenceValue::new(store, key.as_str(), Value::Null).remove()?;
            writeln!(out, "removed")?;
        }

        PrefsCommand::List => {
            for key in store.keys()? {
                writeln!(out, "{}", key)?;
            }
        }
    }

    Ok(())
}

/// Run a secure-store command, writing human output to `out`
pub fn run_secret(
    store: Arc<dyn SecureStore>,
    command: SecretCommand,
    out: &mut impl Write,
) -> CliResult<()> {
    match command {
        SecretCommand::Get { key, accessibility } => {
            let secret = secret_accessor(store, &key, accessibility);
            match secret.try_get()? {
                Some(value) => writeln!(out, "{}", value)?,
                None => return Err(CliError::NotFound(key)),
            }
        }

        SecretCommand::Set {
            key,
            value,
            accessibility,
        } => {
            let value = match value {
                Some(value) => value,
                None => rpassword::prompt_password(format!("Value for {}: ", key))?,
            };

            let secret = secret_accessor(store, &key, accessibility);
            let outcome = secret.set(&value);
            if !outcome.is_success() {
                return Err(CliError::WriteFailed { key, outcome });
            }
            info!("Secret {} {}", key, outcome);
            writeln!(out, "{}", outcome)?;
        }

        SecretCommand::Remove { key, accessibility } => {
            secret_accessor(store, &key, accessibility).remove()?;
            writeln!(out, "removed")?;
        }

        SecretCommand::Dump { key, accessibility } => match store.data(&key, accessibility)? {
            Some(data) => writeln!(out, "{}", hex::encode(data))?,
            None => return Err(CliError::NotFound(key)),
        },
    }

    Ok(())
}

/// Accessor used for every secret the CLI touches
fn secret_accessor(
    store: Arc<dyn SecureStore>,
    key: &str,
    accessibility: Option<Accessibility>,
) -> SecureCodable<String> {
    let secret = SecureCodable::new(store, key, String::new());
    match accessibility {
        Some(accessibility) => secret.with_accessibility(accessibility),
        None => secret,
    }
}

/// Parse `raw` as JSON, falling back to a plain string
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use persist_core::{MemoryPreferenceStore, MemorySecureStore};
    use serde_json::json;

    fn run_prefs_output(store: &Arc<MemoryPreferenceStore>, command: PrefsCommand) -> String {
        let mut out = Vec::new();
        run_prefs(store.clone(), command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn run_secret_output(store: &Arc<MemorySecureStore>, command: SecretCommand) -> String {
        let mut out = Vec::new();
        run_secret(store.clone(), command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("{\"a\":true}"), json!({ "a": true }));
        assert_eq!(parse_value("dark mode"), json!("dark mode"));
    }

    #[test]
    fn test_prefs_set_get_list_remove() {
        let store = Arc::new(MemoryPreferenceStore::new());

        let output = run_prefs_output(
            &store,
            PrefsCommand::Set {
                key: "volume".to_string(),
                value: "7".to_string(),
            },
        );
        assert_eq!(output, "saved\n");

        let output = run_prefs_output(&store, PrefsCommand::Get { key: "volume".to_string() });
        assert_eq!(output, "7\n");

        let output = run_prefs_output(&store, PrefsCommand::List);
        assert_eq!(output, "volume\n");

        run_prefs_output(&store, PrefsCommand::Remove { key: "volume".to_string() });
        let err = run_prefs(
            store.clone(),
            PrefsCommand::Get { key: "volume".to_string() },
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::NotFound(_)));
    }

    #[test]
    fn test_prefs_set_null_removes() {
        let store = Arc::new(MemoryPreferenceStore::new());
        store.set_value("volume", json!(3)).unwrap();

        let output = run_prefs_output(
            &store,
            PrefsCommand::Set {
                key: "volume".to_string(),
                value: "null".to_string(),
            },
        );
        assert_eq!(output, "removed\n");
        assert_eq!(store.get("volume").unwrap(), None);
    }

    #[test]
    fn test_prefs_get_shows_data_entries() {
        let store = Arc::new(MemoryPreferenceStore::new());
        store.set_data("blob", b"{\"a\":1}").unwrap();

        let output = run_prefs_output(&store, PrefsCommand::Get { key: "blob".to_string() });
        assert_eq!(output, "<7 bytes> {\"a\":1}\n");
    }

    #[test]
    fn test_secret_set_get_dump() {
        let store = Arc::new(MemorySecureStore::new());

        run_secret_output(
            &store,
            SecretCommand::Set {
                key: "token".to_string(),
                value: Some("abc".to_string()),
                accessibility: Some(Accessibility::WhenUnlocked),
            },
        );

        let output = run_secret_output(
            &store,
            SecretCommand::Get {
                key: "token".to_string(),
                accessibility: Some(Accessibility::WhenUnlocked),
            },
        );
        assert_eq!(output, "abc\n");

        // JSON-encoded string: "abc"
        let output = run_secret_output(
            &store,
            SecretCommand::Dump {
                key: "token".to_string(),
                accessibility: Some(Accessibility::WhenUnlocked),
            },
        );
        assert_eq!(output, "2261626322\n");

        let err = run_secret(
            store.clone(),
            SecretCommand::Get {
                key: "token".to_string(),
                accessibility: None,
            },
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::NotFound(_)));
    }

    #[test]
    fn test_secret_remove() {
        let store = Arc::new(MemorySecureStore::new());
        store.set("token", b"\"abc\"", None).unwrap();

        run_secret_output(
            &store,
            SecretCommand::Remove {
                key: "token".to_string(),
                accessibility: None,
            },
        );
        assert!(store.is_empty());
    }
}
