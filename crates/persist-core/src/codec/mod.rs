//! Byte codecs used by the accessors
//!
//! This module provides:
//! - The [`Encoder`] / [`Decoder`] capability traits injected into structured accessors
//! - JSON codec (the default structured encoding)
//! - [`Archiver`], the native object archive used by [`SecureValue`](crate::SecureValue)

mod archive;
mod json;

pub use archive::{Archiver, ARCHIVE_MAGIC};
pub use json::{JsonDecoder, JsonEncoder};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

/// Turns a value into bytes
///
/// Implementations must fail with [`PersistError::EncodingError`](crate::PersistError::EncodingError)
/// when the value has no representation in their format.
pub trait Encoder: Send + Sync {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;
}

/// Turns bytes back into a value
///
/// Implementations must fail with [`PersistError::DecodingError`](crate::PersistError::DecodingError)
/// on malformed input or input produced for a different type.
pub trait Decoder: Send + Sync {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T>;
}
