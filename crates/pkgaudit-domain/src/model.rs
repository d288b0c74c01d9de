//! Typed policy documents.
//!
//! Deserialization is deliberately forgiving: a document only has to be shaped right where
//! it matters. Anything that cannot be read as an audit is dropped with a warning instead of
//! failing the whole document.

use crate::ordered::OrderedMap;
use pkgaudit_types::Category;
use serde::de::{Error as DeError, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// One policy file. Only the top-level `pkg` section is read.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PolicyDocument {
    #[serde(default, deserialize_with = "lenient_section")]
    pub pkg: Option<PkgSection>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PkgSection {
    #[serde(default, deserialize_with = "audit_map")]
    pub blacklist: Option<OrderedMap<AuditSpec>>,
    #[serde(default, deserialize_with = "audit_map")]
    pub whitelist: Option<OrderedMap<AuditSpec>>,
}

impl PkgSection {
    pub fn audits(&self, category: Category) -> Option<&OrderedMap<AuditSpec>> {
        match category {
            Category::Blacklist => self.blacklist.as_ref(),
            Category::Whitelist => self.whitelist.as_ref(),
        }
    }
}

/// A single audit id's definition: host-keyed rule buckets plus metadata.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AuditSpec {
    /// Host pattern (fingerprint or `*`) → rule bucket.
    #[serde(default)]
    pub data: OrderedMap<Bucket>,
    /// Everything besides `data`, carried onto each resolved rule.
    #[serde(flatten)]
    pub meta: RuleMetadata,
}

/// Per-item package mapping, normally with a single `name → tag` entry.
pub type PackageItem = OrderedMap<TagSpec>;

/// The rules selected for one host pattern.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Bucket {
    Items(Vec<PackageItem>),
    /// Legacy shape: one `name → tag` mapping instead of a list of single-entry items.
    Mapping(OrderedMap<TagSpec>),
    /// A host pattern with no value.
    Empty,
}

impl Default for Bucket {
    fn default() -> Self {
        Bucket::Items(Vec::new())
    }
}

impl Bucket {
    /// `(package name, tag spec)` pairs in written order, whichever shape the bucket has.
    pub fn entries(&self) -> Vec<(&str, &TagSpec)> {
        match self {
            Bucket::Items(items) => items.iter().flat_map(|item| item.iter()).collect(),
            Bucket::Mapping(map) => map.iter().collect(),
            Bucket::Empty => Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TagSpec {
    /// `package: TAG`; numbers and booleans are read as their text.
    BareTag(#[serde(deserialize_with = "scalar")] String),
    /// `package: {tag: TAG, version: ..., control: ..., ...}`
    DetailedTag(DetailedTag),
}

impl TagSpec {
    pub fn tag(&self) -> &str {
        match self {
            TagSpec::BareTag(tag) => tag,
            TagSpec::DetailedTag(detail) => &detail.tag,
        }
    }

    /// Per-item fields that override the audit's metadata.
    pub fn overrides(&self) -> Option<&RuleMetadata> {
        match self {
            TagSpec::BareTag(_) => None,
            TagSpec::DetailedTag(detail) => Some(&detail.overrides),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DetailedTag {
    #[serde(deserialize_with = "scalar")]
    pub tag: String,
    #[serde(flatten)]
    pub overrides: RuleMetadata,
}

/// Fields shared by audit-level metadata and per-item overrides.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RuleMetadata {
    #[serde(default, deserialize_with = "opt_scalar")]
    pub version: Option<String>,
    /// A present-but-empty `control:` still marks the rule controlled.
    #[serde(default, deserialize_with = "control_scalar")]
    pub control: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub alert: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub trigger: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

impl RuleMetadata {
    /// `top` laid over `self`: fields set in `top` win.
    pub fn overlay(&self, top: &RuleMetadata) -> RuleMetadata {
        let mut extra = self.extra.clone();
        extra.extend(top.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        RuleMetadata {
            version: top.version.clone().or_else(|| self.version.clone()),
            control: top.control.clone().or_else(|| self.control.clone()),
            description: top.description.clone().or_else(|| self.description.clone()),
            alert: top.alert.clone().or_else(|| self.alert.clone()),
            trigger: top.trigger.clone().or_else(|| self.trigger.clone()),
            extra,
        }
    }
}

/// Holds `Some(T)` when the value has `T`'s shape and `None` otherwise.
struct Lenient<T>(Option<T>);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape<T> {
            Valid(T),
            Other(IgnoredAny),
        }

        Ok(match Shape::<T>::deserialize(deserializer)? {
            Shape::Valid(value) => Lenient(Some(value)),
            Shape::Other(_) => Lenient(None),
        })
    }
}

fn lenient_section<'de, D>(deserializer: D) -> Result<Option<PkgSection>, D::Error>
where
    D: Deserializer<'de>,
{
    let section = Lenient::<PkgSection>::deserialize(deserializer)?.0;
    if section.is_none() {
        tracing::warn!("ignoring `pkg` section that is not a mapping");
    }
    Ok(section)
}

fn audit_map<'de, D>(deserializer: D) -> Result<Option<OrderedMap<AuditSpec>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Lenient::<OrderedMap<Lenient<AuditSpec>>>::deserialize(deserializer)?.0 else {
        tracing::warn!("ignoring audit category that is not a mapping");
        return Ok(None);
    };

    let audits = raw
        .into_iter()
        .filter_map(|(audit_id, spec)| match spec.0 {
            Some(spec) => Some((audit_id, spec)),
            None => {
                tracing::warn!(audit_id = %audit_id, "skipping malformed audit");
                None
            }
        })
        .collect();
    Ok(Some(audits))
}

fn scalar_to_string<E: DeError>(value: JsonValue) -> Result<Option<String>, E> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => Ok(Some(s)),
        JsonValue::Number(n) => Ok(Some(n.to_string())),
        JsonValue::Bool(b) => Ok(Some(b.to_string())),
        other => Err(E::custom(format!("expected a scalar, found {other}"))),
    }
}

fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    scalar_to_string::<D::Error>(JsonValue::deserialize(deserializer)?)?
        .ok_or_else(|| D::Error::custom("expected a scalar, found null"))
}

fn opt_scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<JsonValue>::deserialize(deserializer)? {
        Some(value) => scalar_to_string(value),
        None => Ok(None),
    }
}

fn control_scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Some(opt_scalar(deserializer)?.unwrap_or_default()))
}
