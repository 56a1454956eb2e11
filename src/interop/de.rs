//! Serde `Deserializer` reading typed data back out of a [`Value`].
//!
//! The mapping mirrors [`super::ser`]: `Int` feeds both integer and `bool`
//! fields (non-zero is `true`), `Str` feeds unit variants, and single-entry
//! maps feed newtype, tuple and struct variants.
//!
//! Container nesting is bounded by the configured `max_depth`, so a cyclic
//! value fails with `DepthExceeded` instead of recursing forever.

use crate::config::CodecConfig;
use crate::core::value::Value;
use crate::error::{BionError, Result};
use serde::de::value::StringDeserializer;
use serde::de::{
    self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess,
    VariantAccess, Visitor,
};
use serde::forward_to_deserialize_any;

/// Deserialize any `DeserializeOwned` type from a [`Value`]
pub fn from_value<T: DeserializeOwned>(value: &Value) -> Result<T> {
    from_value_with(value, &CodecConfig::default())
}

/// Deserialize from a [`Value`] using the nesting limit of `config`
pub fn from_value_with<T: DeserializeOwned>(value: &Value, config: &CodecConfig) -> Result<T> {
    T::deserialize(ValueDeserializer::new(value.clone(), config.max_depth))
}

pub struct ValueDeserializer {
    value: Value,
    depth: usize,
    max_depth: usize,
}

impl ValueDeserializer {
    pub fn new(value: Value, max_depth: usize) -> Self {
        Self {
            value,
            depth: 0,
            max_depth,
        }
    }

    fn enter(&self) -> Result<usize> {
        let depth = self.depth + 1;
        if depth > self.max_depth {
            return Err(BionError::DepthExceeded(self.max_depth));
        }
        Ok(depth)
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = BionError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Float(f) => visitor.visit_f64(f),
            Value::Int(n) => visitor.visit_i64(n),
            Value::Str(ref s) => visitor.visit_str(s),
            Value::Bytes(ref b) => visitor.visit_bytes(b),
            Value::List(ref list) => {
                let depth = self.enter()?;
                let items = list.borrow().clone();
                let len = items.len();
                let mut seq = SeqDeserializer {
                    iter: items.into_iter(),
                    depth,
                    max_depth: self.max_depth,
                };
                let out = visitor.visit_seq(&mut seq)?;
                if seq.iter.len() != 0 {
                    return Err(de::Error::invalid_length(len, &"fewer elements in list"));
                }
                Ok(out)
            }
            Value::Map(ref map) => {
                let depth = self.enter()?;
                let entries: Vec<(String, Value)> = map
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect();
                visitor.visit_map(MapDeserializer {
                    iter: entries.into_iter(),
                    pending: None,
                    depth,
                    max_depth: self.max_depth,
                })
            }
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Int(n) => visitor.visit_bool(n != 0),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.value {
            Value::Str(ref s) => {
                let variant: StringDeserializer<BionError> = s.to_string().into_deserializer();
                visitor.visit_enum(variant)
            }
            Value::Map(ref map) => {
                let depth = self.enter()?;
                let map = map.borrow();
                let mut entries = map.iter();
                match (entries.next(), entries.next()) {
                    (Some((variant, inner)), None) => visitor.visit_enum(EnumDeserializer {
                        variant: variant.to_string(),
                        value: inner.clone(),
                        depth,
                        max_depth: self.max_depth,
                    }),
                    _ => Err(de::Error::invalid_value(
                        de::Unexpected::Map,
                        &"map with a single variant key",
                    )),
                }
            }
            ref other => Err(de::Error::invalid_type(
                de::Unexpected::Other(other.type_name()),
                &"string or single-entry map",
            )),
        }
    }

    forward_to_deserialize_any! {
        i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
    depth: usize,
    max_depth: usize,
}

impl<'de> SeqAccess<'de> for SeqDeserializer {
    type Error = BionError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        match self.iter.next() {
            Some(value) => seed
                .deserialize(ValueDeserializer {
                    value,
                    depth: self.depth,
                    max_depth: self.max_depth,
                })
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: std::vec::IntoIter<(String, Value)>,
    pending: Option<Value>,
    depth: usize,
    max_depth: usize,
}

impl<'de> MapAccess<'de> for MapDeserializer {
    type Error = BionError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        match self.iter.next() {
            Some((key, value)) => {
                self.pending = Some(value);
                let key: StringDeserializer<BionError> = key.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let value = self
            .pending
            .take()
            .ok_or_else(|| BionError::Custom("map value requested before its key".into()))?;
        seed.deserialize(ValueDeserializer {
            value,
            depth: self.depth,
            max_depth: self.max_depth,
        })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
    depth: usize,
    max_depth: usize,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
    type Error = BionError;
    type Variant = ValueDeserializer;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let variant: StringDeserializer<BionError> = self.variant.into_deserializer();
        let variant = seed.deserialize(variant)?;
        Ok((
            variant,
            ValueDeserializer {
                value: self.value,
                depth: self.depth,
                max_depth: self.max_depth,
            },
        ))
    }
}

impl<'de> VariantAccess<'de> for ValueDeserializer {
    type Error = BionError;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Null => Ok(()),
            ref other => Err(de::Error::invalid_type(
                de::Unexpected::Other(other.type_name()),
                &"unit variant",
            )),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(self)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_map(self, visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_scalars() {
        assert_eq!(from_value::<u8>(&Value::Int(200)).unwrap(), 200);
        assert!(from_value::<bool>(&Value::Int(1)).unwrap());
        assert!(!from_value::<bool>(&Value::Int(0)).unwrap());
        assert_eq!(from_value::<Option<i32>>(&Value::Null).unwrap(), None);
        assert_eq!(from_value::<String>(&Value::from("s")).unwrap(), "s");
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(from_value::<u8>(&Value::Int(300)).is_err());
        assert!(from_value::<String>(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_cycle_hits_depth_limit() {
        let list = Value::list();
        list.push(list.clone());

        #[derive(serde::Deserialize, Debug)]
        struct Nested(Vec<Nested>);

        let config = CodecConfig::default_with_overrides(|c| c.max_depth = 16);
        assert!(matches!(
            from_value_with::<Nested>(&list, &config),
            Err(BionError::DepthExceeded(16))
        ));
        if let Some(l) = list.as_list() {
            l.borrow_mut().clear();
        }
    }
}
