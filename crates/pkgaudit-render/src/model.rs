use pkgaudit_types::{Report, ReportEntry, ReportEnvelope, Verdict};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdict {
    Pass,
    Fail,
    Error,
}

/// One report line: a tag summary, or a full rule when the report is verbose.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderableEntry {
    pub tag: String,
    pub description: Option<String>,
    pub package: Option<String>,
    pub version: Option<String>,
    pub control: Option<String>,
    pub error: Option<String>,
}

impl From<&ReportEntry> for RenderableEntry {
    fn from(entry: &ReportEntry) -> Self {
        let base = RenderableEntry {
            tag: entry.tag().to_string(),
            description: entry.description().map(str::to_string),
            ..RenderableEntry::default()
        };
        match entry {
            ReportEntry::Rule(rule) => RenderableEntry {
                package: Some(format!("{} ({})", rule.name, rule.category)),
                version: rule.version.clone(),
                control: rule.control.clone(),
                error: rule.error.clone(),
                ..base
            },
            ReportEntry::Tag(_) => base,
            ReportEntry::Controlled(summary) => RenderableEntry {
                control: Some(summary.control.clone()),
                ..base
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdict,
    pub fingerprint: Option<String>,
    pub error: Option<String>,
    pub success: Vec<RenderableEntry>,
    pub failure: Vec<RenderableEntry>,
    pub controlled: Vec<RenderableEntry>,
}

impl RenderableReport {
    pub fn from_report(report: &Report) -> Self {
        let entries = |list: &[ReportEntry]| list.iter().map(RenderableEntry::from).collect();
        RenderableReport {
            verdict: match report.verdict() {
                Verdict::Pass => RenderableVerdict::Pass,
                Verdict::Fail => RenderableVerdict::Fail,
            },
            fingerprint: None,
            error: None,
            success: entries(&report.success),
            failure: entries(&report.failure),
            controlled: entries(report.controlled()),
        }
    }

    pub fn from_envelope(envelope: &ReportEnvelope) -> Self {
        let mut out = Self::from_report(&envelope.results);
        out.fingerprint = Some(envelope.host.fingerprint.clone());
        if let Some(err) = &envelope.error {
            out.verdict = RenderableVerdict::Error;
            out.error = Some(err.clone());
        }
        out
    }
}
