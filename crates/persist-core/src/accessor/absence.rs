//! Detecting values that represent absence
//!
//! A native preference is cleared when its value is `None`, `()` or a unit
//! struct, possibly wrapped in `Some` or newtypes. This is decided from the
//! value's serde shape rather than its JSON form, because JSON also writes
//! non-finite floats as `null`.

use serde::ser::{self, Impossible, Serialize, Serializer};
use std::fmt;

/// Whether `value` represents absence
pub(crate) fn is_absent<T: Serialize + ?Sized>(value: &T) -> bool {
    value.serialize(AbsenceCheck).unwrap_or(false)
}

struct AbsenceCheck;

/// Short-circuits compound values, which are never absent
#[derive(Debug)]
struct Present;

impl fmt::Display for Present {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("value is present")
    }
}

impl std::error::Error for Present {}

impl ser::Error for Present {
    fn custom<M: fmt::Display>(_msg: M) -> Self {
        Present
    }
}

type Compound = Impossible<bool, Present>;
type Check = Result<bool, Present>;

impl Serializer for AbsenceCheck {
    type Ok = bool;
    type Error = Present;
    type SerializeSeq = Compound;
    type SerializeTuple = Compound;
    type SerializeTupleStruct = Compound;
    type SerializeTupleVariant = Compound;
    type SerializeMap = Compound;
    type SerializeStruct = Compound;
    type SerializeStructVariant = Compound;

    fn serialize_none(self) -> Check {
        Ok(true)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Check {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Check {
        Ok(true)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Check {
        Ok(true)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Check {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Check {
        Ok(false)
    }

    fn serialize_i8(self, _v: i8) -> Check {
        Ok(false)
    }

    fn serialize_i16(self, _v: i16) -> Check {
        Ok(false)
    }

    fn serialize_i32(self, _v: i32) -> Check {
        Ok(false)
    }

    fn serialize_i64(self, _v: i64) -> Check {
        Ok(false)
    }

    fn serialize_u8(self, _v: u8) -> Check {
        Ok(false)
    }

    fn serialize_u16(self, _v: u16) -> Check {
        Ok(false)
    }

    fn serialize_u32(self, _v: u32) -> Check {
        Ok(false)
    }

    fn serialize_u64(self, _v: u64) -> Check {
        Ok(false)
    }

    fn serialize_f32(self, _v: f32) -> Check {
        Ok(false)
    }

    fn serialize_f64(self, _v: f64) -> Check {
        Ok(false)
    }

    fn serialize_char(self, _v: char) -> Check {
        Ok(false)
    }

    fn serialize_str(self, _v: &str) -> Check {
        Ok(false)
    }

    fn serialize_bytes(self, _v: &[u8]) -> Check {
        Ok(false)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Check {
        Ok(false)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Check {
        Ok(false)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Compound, Present> {
        Err(Present)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Compound, Present> {
        Err(Present)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Compound, Present> {
        Err(Present)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Compound, Present> {
        Err(Present)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Compound, Present> {
        Err(Present)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Compound, Present> {
        Err(Present)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Compound, Present> {
        Err(Present)
    }
}
