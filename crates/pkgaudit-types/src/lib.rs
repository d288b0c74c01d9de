//! Stable DTOs and IDs used across the pkgaudit workspace.
//!
//! This crate is intentionally boring:
//! - the flattened rule record every audit is evaluated from
//! - the `Success` / `Failure` / `Controlled` report and its envelope
//! - stable string IDs and schema names

#![forbid(unsafe_code)]

pub mod ids;
pub mod receipt;
pub mod rule;

pub use receipt::{
    ControlledSummary, HostMeta, Report, ReportEntry, ReportEnvelope, SCHEMA_REPORT_V1,
    TagSummary, ToolMeta, Verdict,
};
pub use rule::{Category, ResolvedRule};
