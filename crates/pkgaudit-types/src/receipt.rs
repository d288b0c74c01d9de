use crate::rule::ResolvedRule;
use serde::de::Error as DeError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Stable schema identifier for pkgaudit report envelopes.
pub const SCHEMA_REPORT_V1: &str = "pkgaudit.report.v1";

/// Non-verbose `Success` / `Failure` entry, serialized as `{tag: description}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagSummary {
    pub tag: String,
    pub description: Option<String>,
}

/// Non-verbose `Controlled` entry, serialized as `{tag: {description, control}}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ControlledSummary {
    pub tag: String,
    pub description: Option<String>,
    pub control: String,
}

/// One line of a report bucket.
///
/// Verbose reports carry whole rules; the default report carries deduplicated summaries.
#[derive(Clone, Debug, PartialEq)]
pub enum ReportEntry {
    Rule(ResolvedRule),
    Tag(TagSummary),
    Controlled(ControlledSummary),
}

impl ReportEntry {
    pub fn tag(&self) -> &str {
        match self {
            ReportEntry::Rule(rule) => &rule.tag,
            ReportEntry::Tag(summary) => &summary.tag,
            ReportEntry::Controlled(summary) => &summary.tag,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            ReportEntry::Rule(rule) => rule.description.as_deref(),
            ReportEntry::Tag(summary) => summary.description.as_deref(),
            ReportEntry::Controlled(summary) => summary.description.as_deref(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ControlDetail {
    description: Option<String>,
    control: String,
}

impl Serialize for ReportEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReportEntry::Rule(rule) => rule.serialize(serializer),
            ReportEntry::Tag(summary) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(&summary.tag, &summary.description)?;
                map.end()
            }
            ReportEntry::Controlled(summary) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(
                    &summary.tag,
                    &ControlDetail {
                        description: summary.description.clone(),
                        control: summary.control.clone(),
                    },
                )?;
                map.end()
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Rule(ResolvedRule),
    Summary(BTreeMap<String, RawSummary>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSummary {
    Controlled(ControlDetail),
    Description(Option<String>),
}

impl<'de> Deserialize<'de> for ReportEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawEntry::deserialize(deserializer)? {
            RawEntry::Rule(rule) => Ok(ReportEntry::Rule(rule)),
            RawEntry::Summary(map) => {
                if map.len() != 1 {
                    return Err(<D::Error as DeError>::custom(format!(
                        "summary entry must have exactly one tag key, found {}",
                        map.len()
                    )));
                }
                let Some((tag, summary)) = map.into_iter().next() else {
                    return Err(<D::Error as DeError>::custom("empty summary entry"));
                };
                Ok(match summary {
                    RawSummary::Controlled(detail) => ReportEntry::Controlled(ControlledSummary {
                        tag,
                        description: detail.description,
                        control: detail.control,
                    }),
                    RawSummary::Description(description) => {
                        ReportEntry::Tag(TagSummary { tag, description })
                    }
                })
            }
        }
    }
}

/// The terminal audit output.
///
/// `Controlled` is `None` (and absent from the serialized form) when no rule was controlled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "Success", default)]
    pub success: Vec<ReportEntry>,
    #[serde(rename = "Failure", default)]
    pub failure: Vec<ReportEntry>,
    #[serde(
        rename = "Controlled",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub controlled: Option<Vec<ReportEntry>>,
}

impl Report {
    pub fn controlled(&self) -> &[ReportEntry] {
        self.controlled.as_deref().unwrap_or(&[])
    }

    pub fn verdict(&self) -> Verdict {
        if self.failure.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostMeta {
    pub fingerprint: String,
}

/// Report plus run metadata, as written to disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    pub host: HostMeta,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    /// Set when the run aborted before producing results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub results: Report,
}
