use crate::merge::{AuditEntry, MergedPolicy};
use crate::model::{Bucket, RuleMetadata, TagSpec};
use pkgaudit_types::ids::{HOST_WILDCARD, MODULE_PKG};
use pkgaudit_types::rule::RESERVED_RULE_FIELDS;
use pkgaudit_types::{Category, ResolvedRule};
use std::collections::HashMap;

/// Tag → rules, iterated in the order each tag was first seen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TagTable {
    entries: Vec<(String, Vec<ResolvedRule>)>,
    index: HashMap<String, usize>,
}

impl TagTable {
    pub fn push(&mut self, rule: ResolvedRule) {
        match self.index.get(&rule.tag) {
            Some(&slot) => self.entries[slot].1.push(rule),
            None => {
                self.index.insert(rule.tag.clone(), self.entries.len());
                self.entries.push((rule.tag.clone(), vec![rule]));
            }
        }
    }

    pub fn get(&self, tag: &str) -> Option<&[ResolvedRule]> {
        self.index
            .get(tag)
            .map(|&slot| self.entries[slot].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ResolvedRule])> {
        self.entries
            .iter()
            .map(|(tag, rules)| (tag.as_str(), rules.as_slice()))
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(tag, _)| tag.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rule_count(&self) -> usize {
        self.entries.iter().map(|(_, rules)| rules.len()).sum()
    }
}

/// Build the tag table for one host.
pub fn resolve(merged: &MergedPolicy, fingerprint: &str) -> TagTable {
    let mut table = TagTable::default();

    for category in Category::ALL {
        for entry in merged.audits(category) {
            let Some(bucket) = select_bucket(entry, fingerprint) else {
                tracing::trace!(audit_id = %entry.id, fingerprint, "no bucket for host");
                continue;
            };
            if matches!(bucket, Bucket::Mapping(_)) {
                tracing::debug!(audit_id = %entry.id, "normalizing mapping-shaped bucket");
            }
            for (name, spec) in bucket.entries() {
                table.push(build_rule(entry, category, name, spec));
            }
        }
    }

    tracing::debug!(
        fingerprint,
        tags = table.len(),
        rules = table.rule_count(),
        "resolved policy"
    );
    table
}

/// Exact fingerprint first, then the wildcard.
fn select_bucket<'a>(entry: &'a AuditEntry, fingerprint: &str) -> Option<&'a Bucket> {
    let data = &entry.spec.data;
    data.get(fingerprint).or_else(|| data.get(HOST_WILDCARD))
}

/// Audit metadata, then identity fields, then per-item overrides.
fn build_rule(entry: &AuditEntry, category: Category, name: &str, spec: &TagSpec) -> ResolvedRule {
    let meta = match spec.overrides() {
        Some(overrides) => entry.spec.meta.overlay(overrides),
        None => entry.spec.meta.clone(),
    };
    let RuleMetadata {
        version,
        control,
        description,
        alert,
        trigger,
        mut extra,
    } = meta;
    extra.retain(|key, _| !RESERVED_RULE_FIELDS.contains(&key.as_str()));

    ResolvedRule {
        name: name.to_string(),
        tag: spec.tag().to_string(),
        module: MODULE_PKG.to_string(),
        category,
        version,
        control,
        description,
        alert,
        trigger,
        error: None,
        extra,
    }
}
