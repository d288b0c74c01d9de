//! Fuzz target for policy document parsing.
//!
//! Goal: parsing should **never panic** on any input. Malformed YAML may be rejected
//! and malformed audits are dropped, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_policy_yaml
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Limit input size to keep fuzzing fast
    if data.len() > 64 * 1024 {
        return;
    }
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = pkgaudit_source::fuzz::parse_policy_yaml(text);
    }
});
