//! Serde `Serializer` that builds a [`Value`] from any `Serialize` type.
//!
//! | Rust / serde                         | Value                         |
//! |--------------------------------------|-------------------------------|
//! | `bool`                               | `Int(0)` / `Int(1)`           |
//! | integers within `i64`                | `Int`                         |
//! | `f32`, `f64`                         | `Float`                       |
//! | `char`, `&str`, `String`, unit variant | `Str`                       |
//! | `&[u8]` via `serialize_bytes`        | `Bytes`                       |
//! | `()`, `None`, unit struct            | `Null`                        |
//! | sequences, tuples, tuple structs     | `List`                        |
//! | maps, structs                        | `Map`                         |
//! | newtype/tuple/struct variants        | `Map` with one entry          |
//!
//! Integers outside `i64` fail with `UnsupportedType`; map keys that are not
//! strings fail with `NonStringKey`.

use crate::core::value::Value;
use crate::error::{constants, BionError, Result};
use indexmap::IndexMap;
use serde::ser::{self, Impossible, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Convert any `Serialize` type into a [`Value`]
pub fn to_value<T: ?Sized + Serialize>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

fn int_from<T>(v: T) -> Result<Value>
where
    i64: TryFrom<T>,
{
    i64::try_from(v)
        .map(Value::Int)
        .map_err(|_| BionError::UnsupportedType(constants::ERR_INT_OUT_OF_RANGE.to_string()))
}

fn map_value(map: IndexMap<Rc<str>, Value>) -> Value {
    Value::Map(Rc::new(RefCell::new(map)))
}

fn variant_value(variant: &'static str, inner: Value) -> Value {
    let mut map = IndexMap::with_capacity(1);
    map.insert(Rc::from(variant), inner);
    map_value(map)
}

pub struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = BionError;

    type SerializeSeq = SerializeList;
    type SerializeTuple = SerializeList;
    type SerializeTupleStruct = SerializeList;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        int_from(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        int_from(v)
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        int_from(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::from(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value> {
        Ok(variant_value(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeList> {
        Ok(SerializeList {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeList> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeList> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            map: IndexMap::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            map: IndexMap::with_capacity(len),
        })
    }
}

pub struct SerializeList {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SerializeList {
    type Ok = Value;
    type Error = BionError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::list_from(self.items))
    }
}

impl ser::SerializeTuple for SerializeList {
    type Ok = Value;
    type Error = BionError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeList {
    type Ok = Value;
    type Error = BionError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = BionError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(variant_value(self.variant, Value::list_from(self.items)))
    }
}

pub struct SerializeMap {
    map: IndexMap<Rc<str>, Value>,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = BionError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.next_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| BionError::Custom("serialize_value called before serialize_key".into()))?;
        self.map.insert(Rc::from(key), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(map_value(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = BionError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.map.insert(Rc::from(key), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(map_value(self.map))
    }
}

pub struct SerializeStructVariant {
    variant: &'static str,
    map: IndexMap<Rc<str>, Value>,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = BionError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.map.insert(Rc::from(key), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(variant_value(self.variant, map_value(self.map)))
    }
}

/// Accepts only string-like map keys
struct MapKeySerializer;

fn key_error(kind: &str) -> BionError {
    BionError::NonStringKey(kind.to_string())
}

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = BionError;

    type SerializeSeq = Impossible<String, BionError>;
    type SerializeTuple = Impossible<String, BionError>;
    type SerializeTupleStruct = Impossible<String, BionError>;
    type SerializeTupleVariant = Impossible<String, BionError>;
    type SerializeMap = Impossible<String, BionError>;
    type SerializeStruct = Impossible<String, BionError>;
    type SerializeStructVariant = Impossible<String, BionError>;

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String> {
        Err(key_error("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<String> {
        Err(key_error("int"))
    }

    fn serialize_i16(self, _v: i16) -> Result<String> {
        Err(key_error("int"))
    }

    fn serialize_i32(self, _v: i32) -> Result<String> {
        Err(key_error("int"))
    }

    fn serialize_i64(self, _v: i64) -> Result<String> {
        Err(key_error("int"))
    }

    fn serialize_u8(self, _v: u8) -> Result<String> {
        Err(key_error("int"))
    }

    fn serialize_u16(self, _v: u16) -> Result<String> {
        Err(key_error("int"))
    }

    fn serialize_u32(self, _v: u32) -> Result<String> {
        Err(key_error("int"))
    }

    fn serialize_u64(self, _v: u64) -> Result<String> {
        Err(key_error("int"))
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(key_error("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(key_error("float"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(key_error("bytes"))
    }

    fn serialize_none(self) -> Result<String> {
        Err(key_error("null"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<String> {
        Err(key_error("option"))
    }

    fn serialize_unit(self) -> Result<String> {
        Err(key_error("null"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(key_error("null"))
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String> {
        Err(key_error("enum"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_error("list"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_error("list"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_error("list"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_error("enum"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_error("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_error("map"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_error("enum"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_scalars() {
        assert_eq!(to_value(&true).unwrap(), Value::Int(1));
        assert_eq!(to_value(&7u8).unwrap(), Value::Int(7));
        assert_eq!(to_value(&'x').unwrap(), Value::from("x"));
        assert_eq!(to_value(&None::<i32>).unwrap(), Value::Null);
        assert_eq!(to_value(&2.5f32).unwrap(), Value::Float(2.5));
    }

    #[test]
    fn test_out_of_range_integers() {
        assert!(matches!(to_value(&u64::MAX), Err(BionError::UnsupportedType(_))));
        assert!(matches!(to_value(&i128::MIN), Err(BionError::UnsupportedType(_))));
        assert!(to_value(&(i64::MAX as u64)).is_ok());
    }

    #[test]
    fn test_non_string_keys() {
        let mut map = BTreeMap::new();
        map.insert(1u32, "one");
        assert!(matches!(to_value(&map), Err(BionError::NonStringKey(ref k)) if k == "int"));

        let mut ok = BTreeMap::new();
        ok.insert('k', 1);
        assert!(to_value(&ok).is_ok());
    }
}
