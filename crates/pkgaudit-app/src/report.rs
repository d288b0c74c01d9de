use anyhow::Context;
use pkgaudit_render::RenderableReport;
use pkgaudit_types::ids::TOOL_NAME;
use pkgaudit_types::{HostMeta, Report, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta, Verdict};
use time::OffsetDateTime;

use crate::check::verdict_exit_code;

/// A report read back from disk: a full envelope, or the bare `Success`/`Failure` mapping.
#[derive(Clone, Debug, PartialEq)]
pub enum ReportVariant {
    Envelope(ReportEnvelope),
    Bare(Report),
}

pub fn build_envelope(
    results: Report,
    fingerprint: &str,
    started_at: OffsetDateTime,
    finished_at: OffsetDateTime,
) -> ReportEnvelope {
    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        host: HostMeta {
            fingerprint: fingerprint.to_string(),
        },
        started_at,
        finished_at,
        verdict: results.verdict(),
        error: None,
        results,
    }
}

/// Envelope written when the run failed before producing results.
pub fn runtime_error_report(fingerprint: Option<&str>, message: &str) -> ReportEnvelope {
    let now = OffsetDateTime::now_utc();
    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        host: HostMeta {
            fingerprint: fingerprint.unwrap_or("unknown").to_string(),
        },
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        error: Some(message.to_string()),
        results: Report::default(),
    }
}

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: TOOL_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

pub fn parse_report_json(text: &str) -> anyhow::Result<ReportVariant> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    match value.get("schema").and_then(|v| v.as_str()) {
        Some(SCHEMA_REPORT_V1) => {
            let envelope: ReportEnvelope =
                serde_json::from_value(value).context("parse pkgaudit v1 report")?;
            Ok(ReportVariant::Envelope(envelope))
        }
        Some(other) => anyhow::bail!("unknown report schema: {other}"),
        None => {
            let report: Report = serde_json::from_value(value).context("parse bare report")?;
            Ok(ReportVariant::Bare(report))
        }
    }
}

pub fn serialize_report(report: &ReportEnvelope) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &ReportVariant) -> RenderableReport {
    match report {
        ReportVariant::Envelope(envelope) => RenderableReport::from_envelope(envelope),
        ReportVariant::Bare(report) => RenderableReport::from_report(report),
    }
}

/// Exit code for a finished report; runtime errors map to 1.
pub fn report_exit_code(report: &ReportEnvelope) -> i32 {
    if report.error.is_some() {
        1
    } else {
        verdict_exit_code(report.verdict)
    }
}
