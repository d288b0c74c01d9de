use crate::model::{AuditSpec, PolicyDocument};
use pkgaudit_types::Category;

/// One `(audit id, spec)` contribution from one document.
#[derive(Clone, Debug, PartialEq)]
pub struct AuditEntry {
    pub id: String,
    pub spec: AuditSpec,
}

/// All documents' audits, per category, in document order.
///
/// Audit ids repeated across documents stay separate entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergedPolicy {
    pub blacklist: Vec<AuditEntry>,
    pub whitelist: Vec<AuditEntry>,
}

impl MergedPolicy {
    pub fn audits(&self, category: Category) -> &[AuditEntry] {
        match category {
            Category::Blacklist => &self.blacklist,
            Category::Whitelist => &self.whitelist,
        }
    }

    fn audits_mut(&mut self, category: Category) -> &mut Vec<AuditEntry> {
        match category {
            Category::Blacklist => &mut self.blacklist,
            Category::Whitelist => &mut self.whitelist,
        }
    }

    pub fn audit_count(&self) -> usize {
        self.blacklist.len() + self.whitelist.len()
    }
}

pub fn merge<'a, I>(documents: I) -> MergedPolicy
where
    I: IntoIterator<Item = &'a PolicyDocument>,
{
    let mut merged = MergedPolicy::default();

    for doc in documents {
        let Some(pkg) = &doc.pkg else { continue };
        for category in Category::ALL {
            let Some(audits) = pkg.audits(category) else {
                continue;
            };
            merged
                .audits_mut(category)
                .extend(audits.iter().map(|(id, spec)| AuditEntry {
                    id: id.to_string(),
                    spec: spec.clone(),
                }));
        }
    }

    merged
}
