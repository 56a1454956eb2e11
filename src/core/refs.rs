//! # Reference Registry
//!
//! The encode-side [`RefTracker`] and decode-side [`RefTable`] assign and
//! resolve reference indices in first-encounter order. Both are created fresh
//! for a single `encode`/`decode` call and dropped with it.
//!
//! | Value          | Tracked by                  |
//! |----------------|-----------------------------|
//! | map, list      | identity (`Rc` address)     |
//! | string, bytes  | content                     |
//! | null, numbers  | never tracked               |
//!
//! Composites are registered *before* their children are visited and
//! strings/bytes *after* they are fully read. The encoder and decoder must
//! agree on this order or indices resolve to the wrong values.

use crate::core::value::Value;
use crate::error::{BionError, Result};
use std::collections::HashMap;
use std::rc::Rc;

/// Encode-side registry of already emitted values
#[derive(Debug, Default)]
pub struct RefTracker {
    maps: HashMap<usize, usize>,
    lists: HashMap<usize, usize>,
    strings: HashMap<Rc<str>, usize>,
    bytes: HashMap<Rc<[u8]>, usize>,
    next: usize,
}

impl RefTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value, registering it on a miss.
    ///
    /// Returns the index of an earlier occurrence, or `None` when the value
    /// is new (or untracked) and must be emitted in full.
    pub fn check(&mut self, value: &Value) -> Option<usize> {
        match value {
            Value::Map(m) => {
                Self::lookup_or_insert(&mut self.maps, &mut self.next, Rc::as_ptr(m) as usize)
            }
            Value::List(l) => {
                Self::lookup_or_insert(&mut self.lists, &mut self.next, Rc::as_ptr(l) as usize)
            }
            Value::Str(s) => {
                if let Some(&index) = self.strings.get(&**s) {
                    return Some(index);
                }
                self.strings.insert(Rc::clone(s), self.next);
                self.next += 1;
                None
            }
            Value::Bytes(b) => {
                if let Some(&index) = self.bytes.get(&**b) {
                    return Some(index);
                }
                self.bytes.insert(Rc::clone(b), self.next);
                self.next += 1;
                None
            }
            Value::Null | Value::Float(_) | Value::Int(_) => None,
        }
    }

    fn lookup_or_insert(
        seen: &mut HashMap<usize, usize>,
        next: &mut usize,
        address: usize,
    ) -> Option<usize> {
        if let Some(&index) = seen.get(&address) {
            return Some(index);
        }
        seen.insert(address, *next);
        *next += 1;
        None
    }

    /// Number of indices assigned so far
    pub fn len(&self) -> usize {
        self.next
    }

    pub fn is_empty(&self) -> bool {
        self.next == 0
    }
}

/// Decode-side table of registered values, indexed by reference number
#[derive(Debug, Default)]
pub struct RefTable {
    entries: Vec<Value>,
}

impl RefTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value and return its index
    pub fn push(&mut self, value: Value) -> usize {
        self.entries.push(value);
        self.entries.len() - 1
    }

    /// Resolve a reference index.
    ///
    /// Every entry comes back as the handle that was registered: references to
    /// a map or list yield the same object, and references to a string or byte
    /// string share its storage instead of copying it.
    pub fn get(&self, index: i64) -> Result<Value> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.entries.get(i))
            .cloned()
            .ok_or(BionError::DanglingReference {
                index,
                len: self.entries.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composites_tracked_by_identity() {
        let mut tracker = RefTracker::new();
        let a = Value::map();
        let b = Value::map();

        assert_eq!(tracker.check(&a), None);
        assert_eq!(tracker.check(&b), None);
        assert_eq!(tracker.check(&a.clone()), Some(0));
        assert_eq!(tracker.check(&b), Some(1));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_strings_tracked_by_content() {
        let mut tracker = RefTracker::new();
        assert_eq!(tracker.check(&Value::from("key")), None);
        assert_eq!(tracker.check(&Value::from(String::from("key"))), Some(0));
        // bytes live in their own namespace
        assert_eq!(tracker.check(&Value::from(b"key".to_vec())), None);
        assert_eq!(tracker.check(&Value::from(b"key".to_vec())), Some(1));
    }

    #[test]
    fn test_scalars_never_tracked() {
        let mut tracker = RefTracker::new();
        for _ in 0..3 {
            assert_eq!(tracker.check(&Value::Null), None);
            assert_eq!(tracker.check(&Value::Int(7)), None);
            assert_eq!(tracker.check(&Value::Float(1.5)), None);
        }
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_indices_shared_across_kinds() {
        let mut tracker = RefTracker::new();
        let list = Value::list();
        assert_eq!(tracker.check(&list), None);
        assert_eq!(tracker.check(&Value::from("s")), None);
        assert_eq!(tracker.check(&Value::map()), None);
        assert_eq!(tracker.check(&Value::from("s")), Some(1));
        assert_eq!(tracker.check(&list), Some(0));
    }

    #[test]
    fn test_table_resolution() {
        let mut table = RefTable::new();
        let list = Value::list();
        assert_eq!(table.push(list.clone()), 0);
        assert_eq!(table.push(Value::from("x")), 1);

        assert!(table.get(0).map(|v| v.same_object(&list)).unwrap_or(false));
        assert_eq!(table.get(1).ok(), Some(Value::from("x")));
        assert!(matches!(
            table.get(2),
            Err(BionError::DanglingReference { index: 2, len: 2 })
        ));
        assert!(matches!(
            table.get(-1),
            Err(BionError::DanglingReference { index: -1, .. })
        ));
    }

    #[test]
    #[allow(clippy::panic)]
    fn test_table_shares_string_storage() {
        let mut table = RefTable::new();
        table.push(Value::from("a long shared payload"));
        table.push(Value::from(vec![7u8; 64]));

        match (table.get(0), table.get(0)) {
            (Ok(Value::Str(a)), Ok(Value::Str(b))) => assert!(Rc::ptr_eq(&a, &b)),
            other => panic!("expected two strings, got {other:?}"),
        }
        match (table.get(1), table.get(1)) {
            (Ok(Value::Bytes(a)), Ok(Value::Bytes(b))) => assert!(Rc::ptr_eq(&a, &b)),
            other => panic!("expected two byte strings, got {other:?}"),
        }
    }
}
