//! Native object archive for secure-store values
//!
//! Archive format: `{magic}{tag_len}{tag}{payload}`
//! - Magic: 4 bytes, `PKA1`
//! - Tag length: 4 bytes, little-endian u32
//! - Tag: UTF-8 type name of the root value
//! - Payload: bincode encoding of the root value (fixed-width integers)
//!
//! bincode is not self-describing, so the tag is what tells an archive of
//! `u64` apart from one of `f64`. The tag must match the requested type and
//! the payload has to be consumed exactly; anything else is rejected.
//! Type names are only stable for a given toolchain, so an archive written
//! by a build with a different name for the type reads as a mismatch.

use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};
use std::any::type_name;

use super::{Decoder, Encoder};
use crate::error::{PersistError, Result};

/// Leading bytes of every archive
pub const ARCHIVE_MAGIC: &[u8; 4] = b"PKA1";

/// Archiver for arbitrary serde values
#[derive(Debug, Clone, Copy, Default)]
pub struct Archiver;

impl Archiver {
    pub fn new() -> Self {
        Self
    }

    fn options() -> impl Options {
        // DefaultOptions rejects trailing bytes; slice input bounds every length prefix
        bincode::DefaultOptions::new().with_fixint_encoding()
    }

    /// Archive a root value, tagged with its type name
    pub fn archive<T: Serialize + ?Sized>(&self, root: &T) -> Result<Vec<u8>> {
        let tag = type_name::<T>().as_bytes();
        let tag_len = u32::try_from(tag.len())
            .map_err(|_| PersistError::EncodingError("Type name too long".to_string()))?;

        let payload = Self::options()
            .serialize(root)
            .map_err(|e| PersistError::EncodingError(e.to_string()))?;

        let mut data = Vec::with_capacity(ARCHIVE_MAGIC.len() + 4 + tag.len() + payload.len());
        data.extend_from_slice(ARCHIVE_MAGIC);
        data.extend_from_slice(&tag_len.to_le_bytes());
        data.extend_from_slice(tag);
        data.extend_from_slice(&payload);
        Ok(data)
    }

    /// Reconstruct a root value from an archive of the same type
    pub fn unarchive<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T> {
        let rest = data.strip_prefix(ARCHIVE_MAGIC.as_slice()).ok_or_else(|| {
            PersistError::DecodingError("Not an archive: missing magic".to_string())
        })?;

        let (tag_len, rest) = split(rest, 4)?;
        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(tag_len);
        let (tag, payload) = split(rest, u32::from_le_bytes(len_bytes) as usize)?;

        let expected = type_name::<T>();
        if tag != expected.as_bytes() {
            return Err(PersistError::DecodingError(format!(
                "Archive type mismatch: stored {}, expected {}",
                String::from_utf8_lossy(tag),
                expected
            )));
        }

        Self::options()
            .deserialize(payload)
            .map_err(|e| PersistError::DecodingError(format!("Malformed archive: {}", e)))
    }
}

/// Split off the first `len` bytes of an archive header
fn split(data: &[u8], len: usize) -> Result<(&[u8], &[u8])> {
    if data.len() < len {
        return Err(PersistError::DecodingError(
            "Truncated archive header".to_string(),
        ));
    }
    Ok(data.split_at(len))
}

impl Encoder for Archiver {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        self.archive(value)
    }
}

impl Decoder for Archiver {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T> {
        self.unarchive(data)
    }
}
