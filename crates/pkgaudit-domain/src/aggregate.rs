use crate::engine::RawBuckets;
use pkgaudit_types::receipt::{ControlledSummary, TagSummary};
use pkgaudit_types::{Report, ReportEntry, ResolvedRule};
use std::collections::HashSet;

/// Shape evaluated rules into the final report.
///
/// Verbose keeps every rule record. Otherwise each bucket collapses to one entry per
/// distinct `(tag, description)`, or `(tag, description, control)` for controlled rules,
/// in first-seen order. An empty `Controlled` bucket is dropped.
pub fn aggregate(raw: RawBuckets, verbose: bool) -> Report {
    let RawBuckets {
        success,
        failure,
        controlled,
    } = raw;

    let (success, failure, controlled) = if verbose {
        (
            into_entries(success),
            into_entries(failure),
            into_entries(controlled),
        )
    } else {
        (
            summarize(&success),
            summarize(&failure),
            summarize_controlled(&controlled),
        )
    };

    Report {
        success,
        failure,
        controlled: (!controlled.is_empty()).then_some(controlled),
    }
}

fn into_entries(rules: Vec<ResolvedRule>) -> Vec<ReportEntry> {
    rules.into_iter().map(ReportEntry::Rule).collect()
}

fn summarize(rules: &[ResolvedRule]) -> Vec<ReportEntry> {
    let mut seen = HashSet::new();
    rules
        .iter()
        .map(|rule| TagSummary {
            tag: rule.tag.clone(),
            description: rule.description.clone(),
        })
        .filter(|summary| seen.insert(summary.clone()))
        .map(ReportEntry::Tag)
        .collect()
}

fn summarize_controlled(rules: &[ResolvedRule]) -> Vec<ReportEntry> {
    let mut seen = HashSet::new();
    rules
        .iter()
        .map(|rule| ControlledSummary {
            tag: rule.tag.clone(),
            description: rule.description.clone(),
            control: rule.control.clone().unwrap_or_default(),
        })
        .filter(|summary| seen.insert(summary.clone()))
        .map(ReportEntry::Controlled)
        .collect()
}
