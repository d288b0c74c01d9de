use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_CONFIG_V1: &str = "pkgaudit.config.v1";

/// `pkgaudit.toml` schema v1.
///
/// Every key is optional; a missing file behaves like an empty one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PkgauditConfigV1 {
    /// Optional schema string for tooling (`pkgaudit.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Glob selecting which tags are evaluated. Defaults to `*`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    /// Emit full rule records instead of per-tag summaries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,

    /// Literal host fingerprint, e.g. `CentOS Linux-7`. Detected from os-release when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Policy files or directories, merged in the order given.
    #[serde(default)]
    pub policies: Vec<String>,

    /// JSON `{ "package": "version" }` file used instead of the system package manager.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<String>,
}
