//! Fuzz target for version constraints, loose ordering and tag filters.
//!
//! Goal: none of these should panic, and loose ordering must stay antisymmetric.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_version_constraint
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pkgaudit_domain::TagFilter;
use pkgaudit_domain::version::{VersionConstraint, loose_cmp};

#[derive(Arbitrary, Debug)]
struct ConstraintInput {
    /// Constraint text as written in a policy (e.g. ">=4.3.2").
    constraint: String,
    /// Installed version reported by the package manager.
    installed: String,
    /// Tag glob (e.g. "CIS-*").
    tags: String,
}

fuzz_target!(|input: ConstraintInput| {
    if input.constraint.len() > 256 || input.installed.len() > 256 || input.tags.len() > 256 {
        return;
    }

    if let Ok(constraint) = VersionConstraint::parse(&input.constraint) {
        let _ = constraint.is_satisfied_by(&input.installed);
    }

    let forward = loose_cmp(&input.constraint, &input.installed);
    let backward = loose_cmp(&input.installed, &input.constraint);
    assert_eq!(forward, backward.reverse());

    if let Ok(filter) = TagFilter::new(&input.tags) {
        let _ = filter.is_match(&input.installed);
    }
});
