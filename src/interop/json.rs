//! JSON bridge for debugging and interop.
//!
//! JSON has no reference mechanism, so shared objects are expanded into
//! copies and cycles are rejected. Byte strings become arrays of numbers.

use crate::config::MAX_DEPTH;
use crate::core::value::Value;
use crate::error::{constants, BionError, Result};
use serde_json::{Map, Number, Value as Json};
use std::rc::Rc;

/// Convert a [`Value`] into a `serde_json::Value`
///
/// # Errors
/// - `BionError::UnsupportedType` for non-finite floats or cyclic values
/// - `BionError::DepthExceeded` when nesting exceeds [`MAX_DEPTH`]
pub fn to_json(value: &Value) -> Result<Json> {
    let mut ancestors = Vec::new();
    export(value, &mut ancestors)
}

fn export(value: &Value, ancestors: &mut Vec<usize>) -> Result<Json> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::Int(n) => Json::Number(Number::from(*n)),
        Value::Float(f) => Number::from_f64(*f)
            .map(Json::Number)
            .ok_or_else(|| BionError::UnsupportedType(constants::ERR_NON_FINITE_FLOAT.to_string()))?,
        Value::Str(s) => Json::String(s.to_string()),
        Value::Bytes(b) => Json::Array(b.iter().map(|&x| Json::Number(Number::from(x))).collect()),
        Value::Map(map) => {
            enter(ancestors, Rc::as_ptr(map) as usize)?;
            let mut out = Map::new();
            for (key, item) in map.borrow().iter() {
                out.insert(key.to_string(), export(item, ancestors)?);
            }
            ancestors.pop();
            Json::Object(out)
        }
        Value::List(list) => {
            enter(ancestors, Rc::as_ptr(list) as usize)?;
            let items = list
                .borrow()
                .iter()
                .map(|item| export(item, ancestors))
                .collect::<Result<Vec<_>>>()?;
            ancestors.pop();
            Json::Array(items)
        }
    })
}

fn enter(ancestors: &mut Vec<usize>, address: usize) -> Result<()> {
    if ancestors.contains(&address) {
        return Err(BionError::UnsupportedType(constants::ERR_CYCLIC_VALUE.to_string()));
    }
    if ancestors.len() >= MAX_DEPTH {
        return Err(BionError::DepthExceeded(MAX_DEPTH));
    }
    ancestors.push(address);
    Ok(())
}

/// Convert a `serde_json::Value` into a [`Value`]
///
/// Booleans become `Int(0)`/`Int(1)`. Integers above `i64::MAX` fail with
/// `BionError::UnsupportedType`.
pub fn from_json(json: Json) -> Result<Value> {
    import(json, 0)
}

fn import(json: Json, depth: usize) -> Result<Value> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Int(i64::from(b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if n.is_u64() {
                return Err(BionError::UnsupportedType(constants::ERR_INT_OUT_OF_RANGE.to_string()));
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Json::String(s) => Value::from(s),
        Json::Array(items) => {
            let depth = descend(depth)?;
            Value::list_from(
                items
                    .into_iter()
                    .map(|item| import(item, depth))
                    .collect::<Result<Vec<_>>>()?,
            )
        }
        Json::Object(map) => {
            let depth = descend(depth)?;
            let entries = map
                .into_iter()
                .map(|(k, v)| import(v, depth).map(|v| (k, v)))
                .collect::<Result<Vec<_>>>()?;
            Value::map_from(entries)
        }
    })
}

fn descend(depth: usize) -> Result<usize> {
    if depth >= MAX_DEPTH {
        return Err(BionError::DepthExceeded(MAX_DEPTH));
    }
    Ok(depth + 1)
}
