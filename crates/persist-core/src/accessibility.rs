//! Accessibility descriptors for secure-store entries
//!
//! A descriptor controls when an entry may be read (for example only while
//! the device is unlocked). Stores receive it on every call; `None` means the
//! backend's default protection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PersistError;

/// Protection level of a secure-store entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    /// Readable once the device has been unlocked after boot
    AfterFirstUnlock,
    /// Same as `AfterFirstUnlock`, never migrated to another device
    AfterFirstUnlockThisDeviceOnly,
    /// Readable regardless of lock state
    Always,
    /// Same as `Always`, never migrated to another device
    AlwaysThisDeviceOnly,
    /// Readable only while unlocked and only if a passcode is set
    WhenPasscodeSetThisDeviceOnly,
    /// Readable only while unlocked
    WhenUnlocked,
    /// Same as `WhenUnlocked`, never migrated to another device
    WhenUnlockedThisDeviceOnly,
}

impl Accessibility {
    /// All descriptors, in declaration order
    pub const ALL: [Accessibility; 7] = [
        Accessibility::AfterFirstUnlock,
        Accessibility::AfterFirstUnlockThisDeviceOnly,
        Accessibility::Always,
        Accessibility::AlwaysThisDeviceOnly,
        Accessibility::WhenPasscodeSetThisDeviceOnly,
        Accessibility::WhenUnlocked,
        Accessibility::WhenUnlockedThisDeviceOnly,
    ];

    /// Stable identifier, used when a backend needs to namespace entries
    pub fn as_str(&self) -> &'static str {
        match self {
            Accessibility::AfterFirstUnlock => "after_first_unlock",
            Accessibility::AfterFirstUnlockThisDeviceOnly => "after_first_unlock_this_device_only",
            Accessibility::Always => "always",
            Accessibility::AlwaysThisDeviceOnly => "always_this_device_only",
            Accessibility::WhenPasscodeSetThisDeviceOnly => "when_passcode_set_this_device_only",
            Accessibility::WhenUnlocked => "when_unlocked",
            Accessibility::WhenUnlockedThisDeviceOnly => "when_unlocked_this_device_only",
        }
    }

    /// Whether entries with this descriptor stay bound to the current device
    pub fn is_device_only(&self) -> bool {
        matches!(
            self,
            Accessibility::AfterFirstUnlockThisDeviceOnly
                | Accessibility::AlwaysThisDeviceOnly
                | Accessibility::WhenPasscodeSetThisDeviceOnly
                | Accessibility::WhenUnlockedThisDeviceOnly
        )
    }
}

impl fmt::Display for Accessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Accessibility {
    type Err = PersistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Accessibility::ALL
            .into_iter()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| PersistError::ConfigError(format!("Unknown accessibility: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for accessibility in Accessibility::ALL {
            let parsed: Accessibility = accessibility.as_str().parse().unwrap();
            assert_eq!(parsed, accessibility);
        }
    }

    #[test]
    fn test_parse_accepts_kebab_case() {
        let parsed: Accessibility = "when-unlocked-this-device-only".parse().unwrap();
        assert_eq!(parsed, Accessibility::WhenUnlockedThisDeviceOnly);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "sometimes".parse::<Accessibility>().unwrap_err();
        assert!(matches!(err, PersistError::ConfigError(_)));
    }

    #[test]
    fn test_device_only() {
        assert!(Accessibility::WhenUnlockedThisDeviceOnly.is_device_only());
        assert!(!Accessibility::WhenUnlocked.is_device_only());
    }
}
