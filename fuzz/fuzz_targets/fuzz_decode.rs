#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary input must fail cleanly, never panic or overflow the stack
    if let Ok(value) = bion::decode(data) {
        // Anything that decodes must encode again
        let _ = bion::encode(&value);
    }
});
