//! Stable identifiers shared by the policy format and the emitted reports.

/// Top-level policy document key owning the package audits.
pub const MODULE_PKG: &str = "pkg";

/// Host pattern matching any fingerprint.
pub const HOST_WILDCARD: &str = "*";

/// Report bucket keys.
pub const BUCKET_SUCCESS: &str = "Success";
pub const BUCKET_FAILURE: &str = "Failure";
pub const BUCKET_CONTROLLED: &str = "Controlled";

/// Tool name stamped into report envelopes.
pub const TOOL_NAME: &str = "pkgaudit";
