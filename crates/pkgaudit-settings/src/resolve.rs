use crate::model::{PkgauditConfigV1, SCHEMA_CONFIG_V1};
use anyhow::Context;
use camino::Utf8PathBuf;
use pkgaudit_domain::TagFilter;

pub const DEFAULT_TAGS: &str = "*";
pub const DEFAULT_POLICY_ROOT: &str = ".";

/// Values supplied on the command line; `None` / empty means "not given".
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub tags: Option<String>,
    pub verbose: Option<bool>,
    pub fingerprint: Option<String>,
    pub policies: Vec<Utf8PathBuf>,
    pub inventory: Option<Utf8PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    pub tags: String,
    pub verbose: bool,
    pub fingerprint: Option<String>,
    pub policies: Vec<Utf8PathBuf>,
    pub inventory: Option<Utf8PathBuf>,
}

pub fn resolve_config(
    cfg: PkgauditConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }

    let tags = overrides
        .tags
        .or(cfg.tags)
        .unwrap_or_else(|| DEFAULT_TAGS.to_string());
    validate_tags(&tags)?;

    let verbose = overrides.verbose.or(cfg.verbose).unwrap_or(false);

    let fingerprint = overrides
        .fingerprint
        .or(cfg.fingerprint)
        .filter(|f| !f.is_empty());

    // Policies given on the command line replace the configured list.
    let policies = if !overrides.policies.is_empty() {
        overrides.policies
    } else if !cfg.policies.is_empty() {
        cfg.policies.into_iter().map(Utf8PathBuf::from).collect()
    } else {
        vec![Utf8PathBuf::from(DEFAULT_POLICY_ROOT)]
    };

    let inventory = overrides
        .inventory
        .or_else(|| cfg.inventory.map(Utf8PathBuf::from));

    Ok(ResolvedConfig {
        tags,
        verbose,
        fingerprint,
        policies,
        inventory,
    })
}

fn validate_tags(pattern: &str) -> anyhow::Result<()> {
    TagFilter::new(pattern).with_context(|| format!("invalid tags glob: {pattern}"))?;
    Ok(())
}
