//! JSON codec

use serde::{de::DeserializeOwned, Serialize};

use super::{Decoder, Encoder};
use crate::error::{PersistError, Result};

/// JSON encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder {
    /// Emit indented output
    pub pretty: bool,
}

impl JsonEncoder {
    /// Compact encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented encoder, easier to read in a store inspector
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Encoder for JsonEncoder {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        encoded.map_err(|e| PersistError::EncodingError(e.to_string()))
    }
}

/// JSON decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl JsonDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for JsonDecoder {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T> {
        serde_json::from_slice(data).map_err(|e| PersistError::DecodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_compact_and_pretty() {
        let compact = JsonEncoder::new().encode(&vec![1, 2]).unwrap();
        assert_eq!(compact, b"[1,2]");

        let pretty = JsonEncoder::pretty().encode(&vec![1, 2]).unwrap();
        assert!(pretty.contains(&b'\n'));

        let decoded: Vec<i32> = JsonDecoder.decode(&pretty).unwrap();
        assert_eq!(decoded, vec![1, 2]);
    }

    #[test]
    fn test_non_string_map_keys_fail_to_encode() {
        let mut map = HashMap::new();
        map.insert((1u8, 2u8), "pair");

        let err = JsonEncoder::new().encode(&map).unwrap_err();
        assert!(err.is_encoding());
    }

    #[test]
    fn test_type_mismatch_fails_to_decode() {
        let err = JsonDecoder.decode::<u32>(b"\"text\"").unwrap_err();
        assert!(err.is_decoding());

        let err = JsonDecoder.decode::<String>(b"{not json").unwrap_err();
        assert!(err.is_decoding());
    }
}
