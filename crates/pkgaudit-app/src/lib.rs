//! Use case orchestration for pkgaudit.
//!
//! This crate provides the application layer: use cases that coordinate the domain, source,
//! settings and render layers. It stays thin and delegates the real work to those crates.
//!
//! The CLI crate depends on this; it only handles argument parsing, process spawning and I/O.

#![forbid(unsafe_code)]

mod check;
mod fingerprint;
mod render;
mod report;

pub use check::{CheckInput, CheckOutput, run_check, verdict_exit_code};
pub use fingerprint::{FingerprintInput, detect_fingerprint};
pub use render::{config_schema_json, render_markdown};
pub use report::{
    ReportVariant, build_envelope, parse_report_json, report_exit_code, runtime_error_report,
    serialize_report, to_renderable,
};
