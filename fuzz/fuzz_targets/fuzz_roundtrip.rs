#![no_main]

use bion::{CodecConfig, Decoder, Encoder, IntWidthStrategy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = bion::decode(data) else {
        return;
    };

    // With lossless integer widths a decoded value re-encodes to stable bytes
    let config = CodecConfig::default_with_overrides(|c| c.int_width = IntWidthStrategy::Minimal);
    let encoder = Encoder::new(config.clone());
    let Ok(first) = encoder.encode(&value) else {
        return;
    };
    let again = Decoder::new(config).decode(&first);
    assert!(again.is_ok(), "re-decoding encoder output failed");
    if let Ok(again) = again {
        assert_eq!(encoder.encode(&again).ok(), Some(first));
    }
});
