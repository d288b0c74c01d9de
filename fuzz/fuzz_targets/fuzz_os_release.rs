//! Fuzz target for host fingerprint detection from `os-release` text.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_os_release
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|text: &str| {
    let _ = pkgaudit_source::fuzz::fingerprint_from_os_release(text);
});
