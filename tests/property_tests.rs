//! Property-based tests using proptest
//!
//! These tests validate codec invariants across randomly generated value
//! trees and arbitrary byte input.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bion::{decode, encode, CodecConfig, Decoder, Encoder, IntWidthStrategy, Value};
use proptest::prelude::*;

/// Integers the bit-test width rule stores without truncation
fn bit_test_safe_int() -> impl Strategy<Value = i64> {
    prop_oneof![
        any::<i8>().prop_map(i64::from),
        any::<i8>().prop_map(|n| i64::from(n) << 8),
        any::<i16>().prop_map(|n| i64::from(n) << 16),
        any::<i32>().prop_map(|n| i64::from(n) << 32),
    ]
}

fn value_tree(
    ints: BoxedStrategy<i64>,
    depth: u32,
    branch: usize,
) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<f64>()
            .prop_filter("NaN never equals itself", |f| !f.is_nan())
            .prop_map(Value::Float),
        ints.prop_map(Value::Int),
        "\\PC{0,20}".prop_map(Value::from),
        prop::collection::vec(any::<u8>(), 0..24).prop_map(Value::from),
    ];

    leaf.prop_recursive(depth, 32, branch as u32, move |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..branch).prop_map(Value::list_from),
            prop::collection::vec(("[a-z]{0,6}", inner), 0..branch).prop_map(Value::map_from),
        ]
    })
}

fn minimal_config() -> CodecConfig {
    CodecConfig::default_with_overrides(|c| c.int_width = IntWidthStrategy::Minimal)
}

// Property: any value round-trips losslessly with minimal integer widths
proptest! {
    #[test]
    fn prop_minimal_roundtrip(value in value_tree(any::<i64>().boxed(), 4, 6)) {
        let config = minimal_config();
        let bytes = Encoder::new(config.clone()).encode(&value).expect("encode");
        let decoded = Decoder::new(config).decode(&bytes).expect("decode");
        prop_assert_eq!(decoded, value);
    }
}

// Property: small trees of bit-test-safe integers round-trip with the default rule
proptest! {
    #[test]
    fn prop_bit_test_roundtrip(value in value_tree(bit_test_safe_int().boxed(), 3, 3)) {
        let bytes = encode(&value).expect("encode");
        let decoded = decode(&bytes).expect("decode");
        prop_assert_eq!(decoded, value);
    }
}

// Property: encoding is deterministic
proptest! {
    #[test]
    fn prop_encoding_deterministic(value in value_tree(any::<i64>().boxed(), 3, 4)) {
        let encoder = Encoder::new(minimal_config());
        prop_assert_eq!(encoder.encode(&value).expect("encode"), encoder.encode(&value).expect("encode"));
    }
}

// Property: re-encoding a decoded value reproduces the same bytes
proptest! {
    #[test]
    fn prop_reencode_stable(value in value_tree(any::<i64>().boxed(), 3, 4)) {
        let config = minimal_config();
        let encoder = Encoder::new(config.clone());
        let bytes = encoder.encode(&value).expect("encode");
        let decoded = Decoder::new(config).decode(&bytes).expect("decode");
        prop_assert_eq!(encoder.encode(&decoded).expect("re-encode"), bytes);
    }
}

// Property: a shared container decodes to a single shared object
proptest! {
    #[test]
    fn prop_shared_identity_preserved(
        entries in prop::collection::vec(("[a-z]{1,4}", any::<i32>()), 0..6),
        copies in 2usize..5,
    ) {
        let shared = Value::map_from(entries.into_iter().map(|(k, v)| (k, Value::from(v))));
        let list = Value::list_from(std::iter::repeat(shared).take(copies));

        let config = minimal_config();
        let bytes = Encoder::new(config.clone()).encode(&list).expect("encode");
        let decoded = Decoder::new(config).decode(&bytes).expect("decode");

        let first = decoded.at(0).expect("first");
        for i in 1..copies {
            prop_assert!(first.same_object(&decoded.at(i).expect("element")));
        }
        prop_assert_eq!(decoded, list);
    }
}

// Property: arbitrary bytes never panic the decoder
proptest! {
    #[test]
    fn prop_decode_arbitrary_bytes(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode(&data);
    }
}

// Property: arbitrary bytes after a valid tag never panic the decoder
proptest! {
    #[test]
    fn prop_decode_tagged_garbage(
        tag in prop::sample::select(b"\0fbhlqSBDLR".to_vec()),
        data in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut input = vec![tag];
        input.extend_from_slice(&data);
        let _ = decode(&input);
    }
}
