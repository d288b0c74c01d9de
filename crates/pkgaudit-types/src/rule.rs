use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// Audit category: what the presence of a package means.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Package must not be installed.
    Blacklist,
    /// Package must be installed, optionally at a constrained version.
    Whitelist,
}

impl Category {
    /// Categories in resolution order.
    pub const ALL: [Category; 2] = [Category::Blacklist, Category::Whitelist];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Blacklist => "blacklist",
            Category::Whitelist => "whitelist",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field names with a typed slot on [`ResolvedRule`].
///
/// Opaque metadata using one of these names never lands in `extra`.
pub const RESERVED_RULE_FIELDS: &[&str] = &[
    "name",
    "tag",
    "module",
    "type",
    "version",
    "control",
    "description",
    "alert",
    "trigger",
    "error",
    "data",
];

/// The flattened, per-tag evaluation unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRule {
    /// Package name handed to the package query.
    pub name: String,
    pub tag: String,
    pub module: String,
    #[serde(rename = "type")]
    pub category: Category,

    /// Version constraint (`4.3.2`, `>=4.3.2`, `<=4.3.2`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Reason this rule is an accepted exception. Presence alone short-circuits evaluation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,

    /// Set on evaluation when the rule could not be checked as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Opaque audit metadata, propagated verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

impl ResolvedRule {
    pub fn is_controlled(&self) -> bool {
        self.control.is_some()
    }

    /// Copy of this rule carrying an evaluation error.
    pub fn with_error(&self, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..self.clone()
        }
    }
}
