//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Version constraint parsing and loose ordering
//! - Host bucket selection during resolution
//! - Rule classification and report aggregation

use crate::aggregate::aggregate;
use crate::engine::{AuditVerdict, RawBuckets, TagFilter, classify, evaluate};
use crate::merge::merge;
use crate::resolve::resolve;
use crate::test_support::{audit, bare_item, hosts_audit, rule, whitelist_doc};
use crate::version::{VersionConstraint, VersionError, loose_cmp};
use pkgaudit_types::{Category, ReportEntry, ResolvedRule};
use proptest::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

/// Strategy for package names as distributions spell them.
fn arb_pkg_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9-]{0,11}").unwrap()
}

/// Strategy for CIS-style tags.
fn arb_tag() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z]{2,4}-[0-9]\\.[0-9]").unwrap()
}

/// Strategy for OS package versions: dotted numbers with an optional release suffix.
fn arb_version() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9]{1,3}(\\.[0-9]{1,3}){0,3}(-[a-z0-9]{1,4})?").unwrap()
}

/// Strategy for arbitrary version-ish text, including separators and letters.
fn arb_loose_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9a-z.:~+-]{0,16}").unwrap()
}

/// Strategy for prefixes before `=` that are not `<` or `>`.
fn arb_bad_modifier() -> impl Strategy<Value = String> {
    prop::string::string_regex("[~!a-z0-9]{0,3}").unwrap()
}

fn arb_category() -> impl Strategy<Value = Category> {
    prop_oneof![Just(Category::Blacklist), Just(Category::Whitelist)]
}

fn arb_description() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("Telnet is evil".to_string())),
        Just(Some("RSH is awesome".to_string())),
    ]
}

/// Strategy for resolved rules; a third of them carry a control.
fn arb_rule() -> impl Strategy<Value = ResolvedRule> {
    (
        arb_pkg_name(),
        arb_tag(),
        arb_category(),
        prop::option::of(arb_version()),
        prop::option::weighted(0.3, prop_oneof![Just(String::new()), Just("waived".to_string())]),
        arb_description(),
    )
        .prop_map(|(name, tag, category, version, control, description)| ResolvedRule {
            version,
            control,
            description,
            ..rule(&name, &tag, category)
        })
}

/// Strategy for a package inventory over a small name space so lookups hit.
fn arb_inventory() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(arb_pkg_name(), arb_version(), 0..8)
}

// ============================================================================
// Property tests: Version constraints
// ============================================================================

proptest! {
    /// Loose ordering is reflexive.
    #[test]
    fn loose_cmp_is_reflexive(a in arb_loose_text()) {
        prop_assert_eq!(loose_cmp(&a, &a), Ordering::Equal);
    }

    /// Swapping the arguments reverses the ordering.
    #[test]
    fn loose_cmp_is_antisymmetric(a in arb_loose_text(), b in arb_loose_text()) {
        prop_assert_eq!(loose_cmp(&a, &b), loose_cmp(&b, &a).reverse());
    }

    /// Trailing zero components do not change the ordering.
    #[test]
    fn loose_cmp_ignores_trailing_zeros(a in arb_version()) {
        let padded = format!("{a}.0.0");
        prop_assert_eq!(loose_cmp(&a, &padded), Ordering::Equal);
    }

    /// A version without `=` is satisfied exactly by the identical string.
    #[test]
    fn exact_constraint_is_string_equality(wanted in arb_version(), installed in arb_version()) {
        let constraint = VersionConstraint::parse(&wanted).unwrap();
        prop_assert_eq!(constraint.is_satisfied_by(&installed), wanted == installed);
    }

    /// Both range bounds are inclusive.
    #[test]
    fn range_bounds_are_inclusive(version in arb_version()) {
        let at_most = VersionConstraint::parse(&format!("<={version}")).unwrap();
        let at_least = VersionConstraint::parse(&format!(">={version}")).unwrap();
        prop_assert!(at_most.is_satisfied_by(&version));
        prop_assert!(at_least.is_satisfied_by(&version));
    }

    /// Every installed version satisfies at least one of `<=v` and `>=v`.
    #[test]
    fn ranges_cover_every_version(bound in arb_version(), installed in arb_version()) {
        let at_most = VersionConstraint::parse(&format!("<={bound}")).unwrap();
        let at_least = VersionConstraint::parse(&format!(">={bound}")).unwrap();
        prop_assert!(at_most.is_satisfied_by(&installed) || at_least.is_satisfied_by(&installed));
    }

    /// Any prefix other than `<` or `>` before the first `=` is rejected and named.
    #[test]
    fn unknown_modifiers_are_rejected(modifier in arb_bad_modifier(), version in arb_version()) {
        let text = format!("{modifier}={version}");
        prop_assert_eq!(
            VersionConstraint::parse(&text),
            Err(VersionError::InvalidModifier { modifier: modifier.clone() })
        );
    }
}

// ============================================================================
// Property tests: Resolution
// ============================================================================

proptest! {
    /// A host with its own bucket never sees wildcard rules, and any other host sees only them.
    #[test]
    fn exact_bucket_shadows_wildcard(
        exact in prop::collection::vec((arb_pkg_name(), arb_tag()), 1..6),
        wildcard in prop::collection::vec((arb_pkg_name(), arb_tag()), 1..6),
    ) {
        let items = |pairs: &[(String, String)]| {
            pairs
                .iter()
                .map(|(name, tag)| bare_item(name, tag))
                .collect::<Vec<_>>()
        };
        let policy = whitelist_doc(vec![(
            "audit",
            hosts_audit(
                vec![("Ubuntu-22.04", items(&exact)), ("*", items(&wildcard))],
                None,
            ),
        )]);
        let merged = merge([&policy]);

        let names = |fingerprint: &str| {
            resolve(&merged, fingerprint)
                .iter()
                .flat_map(|(_, rules)| rules.iter().map(|r| r.name.clone()))
                .collect::<HashSet<_>>()
        };
        let expect = |pairs: &[(String, String)]| {
            pairs.iter().map(|(name, _)| name.clone()).collect::<HashSet<_>>()
        };

        prop_assert_eq!(names("Ubuntu-22.04"), expect(&exact));
        prop_assert_eq!(names("Debian-12"), expect(&wildcard));
    }

    /// Resolving the same inputs twice yields the same table.
    #[test]
    fn resolution_is_deterministic(
        pairs in prop::collection::vec((arb_pkg_name(), arb_tag()), 0..10),
    ) {
        let items = pairs.iter().map(|(name, tag)| bare_item(name, tag)).collect();
        let policy = whitelist_doc(vec![("audit", audit("*", items, Some("d")))]);
        let merged = merge([&policy, &policy]);

        let first = resolve(&merged, "any");
        prop_assert_eq!(&first, &resolve(&merged, "any"));
        prop_assert_eq!(first.rule_count(), pairs.len() * 2);
    }
}

// ============================================================================
// Property tests: Classification and aggregation
// ============================================================================

proptest! {
    /// Controlled rules are classified as such whatever the host has installed.
    #[test]
    fn control_always_wins(rule in arb_rule(), installed in arb_inventory()) {
        let rule = ResolvedRule {
            control: Some("accepted".to_string()),
            ..rule
        };
        prop_assert_eq!(classify(&rule, &installed), (AuditVerdict::Controlled, None));
    }

    /// Blacklisted packages pass exactly when they are not installed.
    #[test]
    fn blacklist_passes_iff_absent(name in arb_pkg_name(), installed in arb_inventory()) {
        let r = rule(&name, "T-1", Category::Blacklist);
        let absent = installed.get(&name).is_none_or(|v| v.is_empty());
        let expected = if absent { AuditVerdict::Success } else { AuditVerdict::Failure };
        prop_assert_eq!(classify(&r, &installed).0, expected);
    }

    /// Whitelisted packages without a version pass exactly when they are installed.
    #[test]
    fn whitelist_passes_iff_present(name in arb_pkg_name(), installed in arb_inventory()) {
        let r = rule(&name, "T-1", Category::Whitelist);
        let present = installed.get(&name).is_some_and(|v| !v.is_empty());
        let expected = if present { AuditVerdict::Success } else { AuditVerdict::Failure };
        prop_assert_eq!(classify(&r, &installed).0, expected);
    }

    /// Every rule under a matching tag lands in exactly one bucket.
    #[test]
    fn evaluation_places_every_rule_once(
        rules in prop::collection::vec(arb_rule(), 0..20),
        installed in arb_inventory(),
    ) {
        let mut table = crate::resolve::TagTable::default();
        for r in &rules {
            table.push(r.clone());
        }
        let raw = evaluate(&table, &TagFilter::new("*").unwrap(), &installed);

        prop_assert_eq!(raw.len(), rules.len());
        let controlled = rules.iter().filter(|r| r.is_controlled()).count();
        prop_assert_eq!(raw.controlled.len(), controlled);
    }

    /// Summaries never repeat, and `Controlled` is present only when something was controlled.
    #[test]
    fn summaries_are_unique(
        success in prop::collection::vec(arb_rule(), 0..12),
        failure in prop::collection::vec(arb_rule(), 0..12),
        controlled in prop::collection::vec(arb_rule(), 0..6),
    ) {
        let controlled: Vec<ResolvedRule> = controlled
            .into_iter()
            .map(|r| ResolvedRule { control: r.control.or(Some(String::new())), ..r })
            .collect();
        let had_controlled = !controlled.is_empty();
        let report = aggregate(RawBuckets { success, failure, controlled }, false);

        for bucket in [&report.success, &report.failure] {
            let mut seen = HashSet::new();
            for entry in bucket {
                let ReportEntry::Tag(summary) = entry else {
                    return Err(proptest::test_runner::TestCaseError::fail("expected tag summary"));
                };
                prop_assert!(seen.insert(summary.clone()), "duplicate summary {:?}", summary);
            }
        }
        prop_assert_eq!(report.controlled.is_some(), had_controlled);
    }

    /// Verbose output keeps one entry per evaluated rule.
    #[test]
    fn verbose_keeps_every_rule(
        success in prop::collection::vec(arb_rule(), 0..12),
        failure in prop::collection::vec(arb_rule(), 0..12),
    ) {
        let (ns, nf) = (success.len(), failure.len());
        let report = aggregate(
            RawBuckets { success, failure, ..RawBuckets::default() },
            true,
        );
        prop_assert_eq!(report.success.len(), ns);
        prop_assert_eq!(report.failure.len(), nf);
        prop_assert!(report.controlled.is_none());
    }
}
