use crate::error::DomainError;
use crate::query::PackageQuery;
use crate::resolve::TagTable;
use crate::version::{VersionConstraint, VersionError};
use globset::{GlobBuilder, GlobMatcher};
use pkgaudit_types::{Category, ResolvedRule};

/// Shell-style glob (`*`, `?`, `[...]`) selecting which tags are evaluated.
#[derive(Clone, Debug)]
pub struct TagFilter {
    pattern: String,
    matcher: GlobMatcher,
}

impl TagFilter {
    pub fn new(pattern: &str) -> Result<Self, DomainError> {
        // Tags are not paths: `*` crosses `/`, and `\` is an ordinary character.
        let glob = GlobBuilder::new(pattern)
            .literal_separator(false)
            .backslash_escape(false)
            .build()
            .map_err(|source| DomainError::InvalidTagFilter {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            pattern: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, tag: &str) -> bool {
        self.matcher.is_match(tag)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuditVerdict {
    Success,
    Failure,
    Controlled,
}

/// Evaluated rules before aggregation, in evaluation order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawBuckets {
    pub success: Vec<ResolvedRule>,
    pub failure: Vec<ResolvedRule>,
    pub controlled: Vec<ResolvedRule>,
}

impl RawBuckets {
    pub fn push(&mut self, verdict: AuditVerdict, rule: ResolvedRule) {
        match verdict {
            AuditVerdict::Success => self.success.push(rule),
            AuditVerdict::Failure => self.failure.push(rule),
            AuditVerdict::Controlled => self.controlled.push(rule),
        }
    }

    pub fn len(&self) -> usize {
        self.success.len() + self.failure.len() + self.controlled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Verdict for one rule, plus the version error when its constraint could not be read.
pub fn classify<Q>(rule: &ResolvedRule, query: &Q) -> (AuditVerdict, Option<VersionError>)
where
    Q: PackageQuery + ?Sized,
{
    if rule.is_controlled() {
        return (AuditVerdict::Controlled, None);
    }

    let installed = || {
        query
            .installed_version(&rule.name)
            .filter(|version| !version.is_empty())
    };

    let passed = match (rule.category, rule.version.as_deref()) {
        (Category::Blacklist, _) => installed().is_none(),
        (Category::Whitelist, None) => installed().is_some(),
        (Category::Whitelist, Some(text)) => match VersionConstraint::parse(text) {
            // An absent package reads as "", which loosely orders below any version.
            Ok(constraint) => constraint.is_satisfied_by(&installed().unwrap_or_default()),
            Err(err) => return (AuditVerdict::Failure, Some(err)),
        },
    };

    let verdict = if passed {
        AuditVerdict::Success
    } else {
        AuditVerdict::Failure
    };
    (verdict, None)
}

/// Evaluate every rule under a tag matching `filter`, in table order.
pub fn evaluate<Q>(table: &TagTable, filter: &TagFilter, query: &Q) -> RawBuckets
where
    Q: PackageQuery + ?Sized,
{
    let mut raw = RawBuckets::default();

    for (tag, rules) in table.iter() {
        if !filter.is_match(tag) {
            tracing::trace!(tag, filter = filter.pattern(), "tag filtered out");
            continue;
        }
        for rule in rules {
            let (verdict, error) = classify(rule, query);
            tracing::trace!(tag, name = %rule.name, ?verdict, "evaluated rule");
            let rule = match error {
                Some(err) => {
                    tracing::warn!(
                        version = rule.version.as_deref().unwrap_or_default(),
                        name = %rule.name,
                        tag,
                        "{err} in package version constraint"
                    );
                    rule.with_error(err.to_string())
                }
                None => rule.clone(),
            };
            raw.push(verdict, rule);
        }
    }

    tracing::debug!(
        success = raw.success.len(),
        failure = raw.failure.len(),
        controlled = raw.controlled.len(),
        "evaluated policy"
    );
    raw
}
