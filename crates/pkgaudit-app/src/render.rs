//! Render use cases: Markdown from in-memory reports and the config schema.

use anyhow::Context;
use pkgaudit_render::RenderableReport;

pub fn render_markdown(report: &RenderableReport) -> String {
    pkgaudit_render::render_markdown(report)
}

pub fn config_schema_json() -> anyhow::Result<String> {
    serde_json::to_string_pretty(&pkgaudit_settings::config_schema())
        .context("serialize config schema")
}
