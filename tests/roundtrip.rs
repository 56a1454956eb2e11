//! Integration tests for encode/decode round trips, reference deduplication
//! and cycle support.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use bion::{decode, encode, Value};

fn roundtrip(value: &Value) -> Value {
    let bytes = encode(value).expect("encode should succeed");
    decode(&bytes).expect("decode should succeed")
}

/// Break every cycle reachable from `value` so the test does not leak
fn break_cycles(value: &Value) {
    match value {
        Value::List(l) => l.borrow_mut().clear(),
        Value::Map(m) => m.borrow_mut().clear(),
        _ => {}
    }
}

#[test]
fn test_map_scenario() {
    let value = Value::map_from([
        ("a", Value::Int(1)),
        (
            "b",
            Value::list_from([Value::Int(1), Value::Int(2), Value::Int(3)]),
        ),
    ]);

    let decoded = roundtrip(&value);

    let map = decoded.as_map().expect("map").borrow().clone();
    let keys: Vec<&str> = map.keys().map(|k| &**k).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(map["a"], Value::Int(1));
    let items: Vec<i64> = map["b"]
        .items()
        .expect("list")
        .iter()
        .map(|v| v.as_int().expect("int"))
        .collect();
    assert_eq!(items, vec![1, 2, 3]);
}

#[test]
fn test_scalar_roundtrips() {
    let values = vec![
        Value::Null,
        Value::Float(0.0),
        Value::Float(-1.25e300),
        Value::Float(f64::INFINITY),
        Value::Int(1),
        Value::Int(-1),
        Value::Int(-128),
        Value::Int(256),
        Value::Int(-256),
        Value::Int(0x1_0000),
        Value::Int(0),
        Value::Int(1 << 40),
        Value::Int(i64::MIN),
        Value::from("hello, world"),
        Value::from("héllo ✓"),
        Value::from(""),
        Value::from(vec![0u8, 1, 2, 255]),
        Value::from(Vec::<u8>::new()),
    ];

    for value in &values {
        assert_eq!(&roundtrip(value), value, "roundtrip of {value:?}");
    }
}

#[test]
fn test_nan_roundtrips_bitwise() {
    let decoded = roundtrip(&Value::Float(f64::NAN));
    assert!(decoded.as_float().expect("float").is_nan());
}

#[test]
fn test_empty_containers() {
    let empty_map = encode(&Value::map()).unwrap();
    assert_eq!(empty_map, b"Dq\0\0\0\0\0\0\0\0");
    assert_eq!(decode(&empty_map).unwrap().len(), Some(0));

    let empty_list = encode(&Value::list()).unwrap();
    assert_eq!(empty_list, b"Lq\0\0\0\0\0\0\0\0");
    assert_eq!(decode(&empty_list).unwrap().len(), Some(0));
}

#[test]
fn test_shared_map_encoded_once() {
    let shared = Value::map_from([("k", Value::Int(5))]);
    let list = Value::list_from([shared.clone(), shared]);

    let bytes = encode(&list).unwrap();
    // list(0), map(1), "k"(2); second element references index 1
    assert_eq!(bytes, b"Lb\x02Db\x01Sb\x01kb\x05Rb\x01");
    assert_eq!(bytes.iter().filter(|&&b| b == b'D').count(), 1);

    let decoded = decode(&bytes).unwrap();
    let first = decoded.at(0).unwrap();
    let second = decoded.at(1).unwrap();
    assert!(first.same_object(&second));
    assert_eq!(first.get("k"), Some(Value::Int(5)));
}

#[test]
fn test_equal_but_distinct_maps_encoded_twice() {
    let list = Value::list_from([
        Value::map_from([("k", Value::Int(5))]),
        Value::map_from([("k", Value::Int(5))]),
    ]);

    let bytes = encode(&list).unwrap();
    assert_eq!(bytes.iter().filter(|&&b| b == b'D').count(), 2);

    let decoded = decode(&bytes).unwrap();
    let first = decoded.at(0).unwrap();
    let second = decoded.at(1).unwrap();
    assert!(!first.same_object(&second));
    assert_eq!(first, second);
}

#[test]
fn test_self_containing_list() {
    let list = Value::list();
    list.push(Value::Int(7));
    list.push(list.clone());

    let bytes = encode(&list).unwrap();
    assert_eq!(bytes, b"Lb\x02b\x07Rq\0\0\0\0\0\0\0\0");

    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.at(0), Some(Value::Int(7)));
    assert!(decoded.at(1).unwrap().same_object(&decoded));

    break_cycles(&list);
    break_cycles(&decoded);
}

#[test]
fn test_mutually_referencing_maps() {
    let a = Value::map();
    let b = Value::map();
    a.insert("peer", b.clone());
    b.insert("peer", a.clone());
    a.insert("name", Value::from("a"));
    b.insert("name", Value::from("b"));

    let decoded = roundtrip(&a);
    let peer = decoded.get("peer").unwrap();
    assert_eq!(peer.get("name"), Some(Value::from("b")));
    assert!(peer.get("peer").unwrap().same_object(&decoded));
    assert_eq!(decoded.get("name"), Some(Value::from("a")));

    break_cycles(&a);
    break_cycles(&b);
    break_cycles(&peer);
    break_cycles(&decoded);
}

#[test]
fn test_equal_strings_deduplicated() {
    let first = String::from("repeated");
    let second = first.clone();
    let list = Value::list_from([Value::from(first), Value::from(second)]);

    let bytes = encode(&list).unwrap();
    assert_eq!(bytes.iter().filter(|&&b| b == b'S').count(), 1);
    assert_eq!(bytes.iter().filter(|&&b| b == b'R').count(), 1);
    assert_eq!(decode(&bytes).unwrap(), list);
}

#[test]
fn test_repeated_keys_deduplicated() {
    let rows = Value::list_from((0..3).map(|i| {
        Value::map_from([("id", Value::Int(i + 1)), ("label", Value::from("row"))])
    }));

    let bytes = encode(&rows).unwrap();
    // "id", "label" and "row" are each written in full once
    assert_eq!(bytes.iter().filter(|&&b| b == b'S').count(), 3);
    assert_eq!(decode(&bytes).unwrap(), rows);
}

#[test]
fn test_bytes_and_string_not_merged() {
    let list = Value::list_from([Value::from("ab"), Value::from(b"ab".to_vec())]);
    let bytes = encode(&list).unwrap();
    assert!(!bytes.contains(&b'R'));
    assert_eq!(decode(&bytes).unwrap(), list);
}

#[test]
fn test_reference_inside_nested_structure() {
    let leaf = Value::list_from([Value::from("x")]);
    let tree = Value::map_from([
        ("left", Value::map_from([("leaf", leaf.clone())])),
        ("right", Value::map_from([("leaf", leaf)])),
    ]);

    let decoded = roundtrip(&tree);
    let left = decoded.get("left").unwrap().get("leaf").unwrap();
    let right = decoded.get("right").unwrap().get("leaf").unwrap();
    assert!(left.same_object(&right));
    assert_eq!(decoded, tree);
}

#[test]
fn test_unrecognized_tag_fails() {
    assert!(matches!(
        decode(&[0xFF]),
        Err(bion::BionError::UnrecognizedType(0xFF))
    ));
}
