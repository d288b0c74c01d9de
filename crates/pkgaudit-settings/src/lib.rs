//! Config parsing and resolution.
//!
//! This crate is IO-free: it parses configuration provided as strings and layers CLI
//! overrides on top.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{PkgauditConfigV1, SCHEMA_CONFIG_V1};
pub use resolve::{DEFAULT_POLICY_ROOT, DEFAULT_TAGS, Overrides, ResolvedConfig};

/// Parse `pkgaudit.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<PkgauditConfigV1> {
    let cfg: PkgauditConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the settings one audit runs with (defaults, then file, then overrides).
pub fn resolve_config(
    cfg: PkgauditConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}

/// JSON schema for `pkgaudit.toml`, for editors and config linting.
pub fn config_schema() -> schemars::Schema {
    schemars::schema_for!(PkgauditConfigV1)
}
