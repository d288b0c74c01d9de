use crate::{RenderableEntry, RenderableReport, RenderableVerdict};
use pkgaudit_types::ids::{BUCKET_CONTROLLED, BUCKET_FAILURE, BUCKET_SUCCESS};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Package audit report\n\n");
    let verdict = match report.verdict {
        RenderableVerdict::Pass => "PASS",
        RenderableVerdict::Fail => "FAIL",
        RenderableVerdict::Error => "ERROR",
    };
    out.push_str(&format!("- Verdict: **{verdict}**\n"));
    if let Some(fp) = &report.fingerprint {
        out.push_str(&format!("- Host: `{fp}`\n"));
    }
    out.push_str(&format!(
        "- Failure: {} / Controlled: {} / Success: {}\n\n",
        report.failure.len(),
        report.controlled.len(),
        report.success.len()
    ));

    if let Some(err) = &report.error {
        out.push_str(&format!("> Error: {err}\n\n"));
    }

    if report.failure.is_empty() && report.controlled.is_empty() && report.success.is_empty() {
        out.push_str("No rules evaluated.\n");
        return out;
    }

    section(&mut out, BUCKET_FAILURE, &report.failure);
    section(&mut out, BUCKET_CONTROLLED, &report.controlled);
    section(&mut out, BUCKET_SUCCESS, &report.success);

    out
}

fn section(out: &mut String, title: &str, entries: &[RenderableEntry]) {
    if entries.is_empty() {
        return;
    }
    out.push_str(&format!("## {title}\n\n"));
    for e in entries {
        out.push_str(&format!("- `{}`", e.tag));
        if let Some(pkg) = &e.package {
            out.push_str(&format!(" {pkg}"));
        }
        if let Some(desc) = &e.description {
            out.push_str(&format!(": {desc}"));
        }
        out.push('\n');

        if let Some(version) = &e.version {
            out.push_str(&format!("  - version: `{version}`\n"));
        }
        if let Some(control) = &e.control {
            out.push_str(&format!("  - control: {control}\n"));
        }
        if let Some(error) = &e.error {
            out.push_str(&format!("  - error: {error}\n"));
        }
    }
    out.push('\n');
}
