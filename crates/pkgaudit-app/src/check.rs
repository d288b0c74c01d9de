//! The `check` use case: load policies, audit the host and produce a report envelope.

use crate::fingerprint::{FingerprintInput, detect_fingerprint};
use crate::report::build_envelope;
use anyhow::Context;
use camino::Utf8Path;
use pkgaudit_domain::query::PackageQuery;
use pkgaudit_settings::{Overrides, PkgauditConfigV1, ResolvedConfig};
use pkgaudit_source::{StaticInventory, load_inventory, load_policies};
use pkgaudit_types::{ReportEnvelope, Verdict};
use time::OffsetDateTime;

/// Input for the check use case.
#[derive(Clone, Copy)]
pub struct CheckInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: &'a Overrides,
    /// `os-release` file consulted when no fingerprint is configured.
    pub os_release: &'a Utf8Path,
    /// Package manager queried when no inventory file is configured; `None` when the host
    /// has none we know how to query.
    pub system_query: Option<&'a dyn PackageQuery>,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: ReportEnvelope,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Empty config is allowed; defaults apply.
    let cfg = if input.config_text.trim().is_empty() {
        PkgauditConfigV1::default()
    } else {
        pkgaudit_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = pkgaudit_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let fingerprint = detect_fingerprint(FingerprintInput {
        configured: resolved.fingerprint.as_deref(),
        os_release: input.os_release,
    })?;

    let documents = load_policies(&resolved.policies).context("load policies")?;
    tracing::info!(
        documents = documents.len(),
        fingerprint = %fingerprint,
        tags = %resolved.tags,
        "auditing host"
    );

    let inventory: Option<StaticInventory> = resolved
        .inventory
        .as_deref()
        .map(load_inventory)
        .transpose()
        .context("load inventory")?;
    let query: &dyn PackageQuery = match (&inventory, input.system_query) {
        (Some(inventory), _) => inventory,
        (None, Some(system)) => system,
        (None, None) => {
            anyhow::bail!("no supported package manager found; configure an inventory file")
        }
    };

    let results = pkgaudit_domain::audit(
        &documents,
        fingerprint.as_str(),
        &resolved.tags,
        resolved.verbose,
        query,
    )
    .context("evaluate policy")?;

    let finished_at = OffsetDateTime::now_utc();
    Ok(CheckOutput {
        report: build_envelope(results, &fingerprint, started_at, finished_at),
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Fail => 2,
    }
}
