use crate::model::{
    AuditSpec, Bucket, DetailedTag, PackageItem, PkgSection, PolicyDocument, RuleMetadata,
    TagSpec,
};
use crate::ordered::OrderedMap;
use pkgaudit_types::{Category, ResolvedRule};
use std::collections::BTreeMap;

pub fn bare_item(name: &str, tag: &str) -> PackageItem {
    [(name, TagSpec::BareTag(tag.to_string()))]
        .into_iter()
        .collect()
}

pub fn versioned_item(name: &str, tag: &str, version: &str) -> PackageItem {
    detailed_item(
        name,
        tag,
        RuleMetadata {
            version: Some(version.to_string()),
            ..RuleMetadata::default()
        },
    )
}

pub fn controlled_item(name: &str, tag: &str, control: &str) -> PackageItem {
    detailed_item(
        name,
        tag,
        RuleMetadata {
            control: Some(control.to_string()),
            ..RuleMetadata::default()
        },
    )
}

pub fn detailed_item(name: &str, tag: &str, overrides: RuleMetadata) -> PackageItem {
    [(
        name,
        TagSpec::DetailedTag(DetailedTag {
            tag: tag.to_string(),
            overrides,
        }),
    )]
    .into_iter()
    .collect()
}

/// Audit with a single host bucket.
pub fn audit(host: &str, items: Vec<PackageItem>, description: Option<&str>) -> AuditSpec {
    hosts_audit(vec![(host, items)], description)
}

pub fn hosts_audit(buckets: Vec<(&str, Vec<PackageItem>)>, description: Option<&str>) -> AuditSpec {
    AuditSpec {
        data: buckets
            .into_iter()
            .map(|(host, items)| (host, Bucket::Items(items)))
            .collect(),
        meta: RuleMetadata {
            description: description.map(str::to_string),
            ..RuleMetadata::default()
        },
    }
}

fn audits(entries: Vec<(&str, AuditSpec)>) -> Option<OrderedMap<AuditSpec>> {
    Some(entries.into_iter().collect())
}

pub fn doc(
    blacklist: Vec<(&str, AuditSpec)>,
    whitelist: Vec<(&str, AuditSpec)>,
) -> PolicyDocument {
    PolicyDocument {
        pkg: Some(PkgSection {
            blacklist: audits(blacklist),
            whitelist: audits(whitelist),
        }),
    }
}

pub fn blacklist_doc(entries: Vec<(&str, AuditSpec)>) -> PolicyDocument {
    PolicyDocument {
        pkg: Some(PkgSection {
            blacklist: audits(entries),
            whitelist: None,
        }),
    }
}

pub fn whitelist_doc(entries: Vec<(&str, AuditSpec)>) -> PolicyDocument {
    PolicyDocument {
        pkg: Some(PkgSection {
            blacklist: None,
            whitelist: audits(entries),
        }),
    }
}

pub fn rule(name: &str, tag: &str, category: Category) -> ResolvedRule {
    ResolvedRule {
        name: name.to_string(),
        tag: tag.to_string(),
        module: "pkg".to_string(),
        category,
        version: None,
        control: None,
        description: None,
        alert: None,
        trigger: None,
        error: None,
        extra: BTreeMap::new(),
    }
}

pub fn inventory(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(name, version)| (name.to_string(), version.to_string()))
        .collect()
}

/// Telnet/rsh policy with per-distribution buckets and a wildcard fallback.
pub const SAMPLE_POLICY: &str = r#"
pkg:
  blacklist:
    telnet:
      data:
        CentOS Linux-6:
          - 'telnet': 'CIS-2.1.1'
        '*':
          - 'telnet': 'telnet-bad'
      description: 'Telnet is evil'
      alert: email
      trigger: state
  whitelist:
    rsh:
      data:
        CentOS Linux-6:
          - 'rsh':
              tag: 'CIS-2.1.3'
              version: '4.3.2'
          - 'rsh-client':
              tag: 'CIS-2.1.3'
              version: '>=4.3.2'
          - 'rsh-server': 'CIS-2.1.4'
        CentOS Linux-7:
          - 'rsh': 'CIS-2.1.3'
          - 'rsh-server': 'CIS-2.1.4'
        '*':
          - 'rsh-client': 'CIS-5.1.2'
          - 'rsh-redone-client': 'CIS-5.1.2'
          - 'rsh-server': 'CIS-5.1.3'
          - 'rsh-redone-server': 'CIS-5.1.3'
      description: 'RSH is awesome'
      alert: email
      trigger: state
"#;

pub fn sample_policy() -> PolicyDocument {
    serde_yaml::from_str(SAMPLE_POLICY).expect("sample policy parses")
}
