//! Pure package policy evaluation (no IO).
//!
//! Input: policy documents loaded elsewhere, a host fingerprint and a package query.
//! Output: the `Success` / `Failure` / `Controlled` report.
//!
//! Pipeline: [`merge`] → [`resolve`] → [`evaluate`] → [`aggregate`]; [`audit`] runs all four.

#![forbid(unsafe_code)]

pub mod model;
pub mod query;
pub mod version;

mod aggregate;
mod engine;
mod error;
mod merge;
mod ordered;
mod resolve;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use aggregate::aggregate;
pub use engine::{AuditVerdict, RawBuckets, TagFilter, classify, evaluate};
pub use error::DomainError;
pub use merge::{AuditEntry, MergedPolicy, merge};
pub use ordered::OrderedMap;
pub use resolve::{TagTable, resolve};

use crate::model::PolicyDocument;
use crate::query::{HostFingerprintProvider, PackageQuery};
use pkgaudit_types::Report;

/// Run the whole pipeline for one host.
///
/// The only failure is an unparseable `tags` glob; every policy anomaly degrades to a
/// reported `Failure` or to an absent rule.
pub fn audit<H, Q>(
    documents: &[PolicyDocument],
    host: &H,
    tags: &str,
    verbose: bool,
    query: &Q,
) -> Result<Report, DomainError>
where
    H: HostFingerprintProvider + ?Sized,
    Q: PackageQuery + ?Sized,
{
    let filter = TagFilter::new(tags)?;
    let merged = merge(documents);
    let table = resolve(&merged, &host.fingerprint());
    let raw = evaluate(&table, &filter, query);
    Ok(aggregate(raw, verbose))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{inventory, sample_policy};
    use serde_json::json;

    #[test]
    fn absent_blacklisted_package_is_reported_as_success() {
        let report = audit(
            &[sample_policy()],
            "Debian-12",
            "telnet-*",
            false,
            &inventory(&[("telnet", "")]),
        )
        .expect("audit");

        let value = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(
            value,
            json!({
                "Success": [{"telnet-bad": "Telnet is evil"}],
                "Failure": [],
            })
        );
    }

    #[test]
    fn invalid_tag_glob_is_rejected_before_evaluation() {
        let err = audit(&[sample_policy()], "Debian-12", "CIS-[", false, &inventory(&[]))
            .expect_err("invalid glob");
        assert!(matches!(err, DomainError::InvalidTagFilter { .. }));
    }
}
