//! # Value Model
//!
//! Dynamic, JSON-like values understood by the codec.
//!
//! Maps and lists are shared handles (`Rc<RefCell<..>>`). Two `Value`s holding
//! the same handle are the *same object*: the encoder emits the object once
//! and references it afterwards, and the decoder hands back one handle for
//! every reference to it. Sharing a handle inside itself builds a cycle.
//!
//! Strings, byte strings and map keys are reference counted as well, so a
//! value referenced many times shares one allocation instead of being copied.
//!
//! Cycles built from `Rc` are never freed on their own. Break them (for
//! example by clearing one of the containers) once the graph is no longer
//! needed.

use indexmap::IndexMap;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// Shared, insertion-ordered string-keyed map
pub type MapRef = Rc<RefCell<IndexMap<Rc<str>, Value>>>;

/// Shared, ordered list
pub type ListRef = Rc<RefCell<Vec<Value>>>;

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Float(f64),
    Int(i64),
    Str(Rc<str>),
    Bytes(Rc<[u8]>),
    Map(MapRef),
    List(ListRef),
}

impl Value {
    /// Create a new empty map
    pub fn map() -> Self {
        Value::Map(Rc::new(RefCell::new(IndexMap::new())))
    }

    /// Create a new empty list
    pub fn list() -> Self {
        Value::List(Rc::new(RefCell::new(Vec::new())))
    }

    /// Create a map from key/value pairs, keeping their order
    pub fn map_from<K, I>(entries: I) -> Self
    where
        K: Into<Rc<str>>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .collect::<IndexMap<_, _>>();
        Value::Map(Rc::new(RefCell::new(map)))
    }

    /// Create a list from values, keeping their order
    pub fn list_from<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(&**b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Entry stored under `key` if this is a map
    pub fn get(&self, key: &str) -> Option<Value> {
        self.as_map().and_then(|m| m.borrow().get(key).cloned())
    }

    /// Element at `index` if this is a list
    pub fn at(&self, index: usize) -> Option<Value> {
        self.as_list().and_then(|l| l.borrow().get(index).cloned())
    }

    /// Number of entries of a map or elements of a list
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Map(m) => Some(m.borrow().len()),
            Value::List(l) => Some(l.borrow().len()),
            _ => None,
        }
    }

    /// Borrow the items of a list
    pub fn items(&self) -> Option<Ref<'_, Vec<Value>>> {
        self.as_list().map(|l| l.borrow())
    }

    /// Append to a list, returning false if this is not a list
    pub fn push(&self, item: Value) -> bool {
        match self {
            Value::List(l) => {
                l.borrow_mut().push(item);
                true
            }
            _ => false,
        }
    }

    /// Insert into a map, returning false if this is not a map
    pub fn insert(&self, key: impl Into<Rc<str>>, item: Value) -> bool {
        match self {
            Value::Map(m) => {
                m.borrow_mut().insert(key.into(), item);
                true
            }
            _ => false,
        }
    }

    /// Identity comparison: true only when both are the same map or list object
    pub fn same_object(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Float(_) => "float",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Map(_) => "map",
            Value::List(_) => "list",
        }
    }
}

/// Structural equality.
///
/// Composites that are the same object compare equal without descending, so
/// a cyclic value equals itself. Two distinct cyclic graphs are compared by
/// walking them and will not terminate.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                // order matters
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
            }
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Float(x) => write!(f, "Float({x:?})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Bytes(b) => write!(f, "Bytes({b:?})"),
            // shallow: a cyclic graph would otherwise never finish printing
            Value::Map(m) => match m.try_borrow() {
                Ok(map) => write!(f, "Map@{:p}(len={})", Rc::as_ptr(m), map.len()),
                Err(_) => write!(f, "Map@{:p}(<borrowed>)", Rc::as_ptr(m)),
            },
            Value::List(l) => match l.try_borrow() {
                Ok(list) => write!(f, "List@{:p}(len={})", Rc::as_ptr(l), list.len()),
                Err(_) => write!(f, "List@{:p}(<borrowed>)", Rc::as_ptr(l)),
            },
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(Rc::from(v))
    }
}

impl From<Rc<str>> for Value {
    fn from(v: Rc<str>) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(Rc::from(v))
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(Rc::from(v))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::list_from(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_vs_equality() {
        let a = Value::map_from([("k", Value::Int(1))]);
        let b = Value::map_from([("k", Value::Int(1))]);
        assert_eq!(a, b);
        assert!(!a.same_object(&b));
        assert!(a.same_object(&a.clone()));
        assert!(!Value::Int(1).same_object(&Value::Int(1)));
    }

    #[test]
    fn test_map_order_matters() {
        let a = Value::map_from([("x", Value::Null), ("y", Value::Null)]);
        let b = Value::map_from([("y", Value::Null), ("x", Value::Null)]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_cyclic_value_equals_itself() {
        let list = Value::list();
        list.push(list.clone());
        assert_eq!(list, list.clone());
        assert!(format!("{list:?}").starts_with("List@"));
        // break the cycle so the test does not leak
        if let Some(l) = list.as_list() {
            l.borrow_mut().clear();
        }
    }

    #[test]
    fn test_accessors() {
        let v = Value::map_from([("n", Value::from(3)), ("s", Value::from("hi"))]);
        assert_eq!(v.get("n").and_then(|n| n.as_int()), Some(3));
        assert_eq!(v.get("s").as_ref().and_then(Value::as_str), Some("hi"));
        assert_eq!(v.len(), Some(2));
        assert!(v.get("missing").is_none());
        assert!(!Value::Null.push(Value::Null));
        assert_eq!(Value::from(true), Value::Int(1));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }
}
