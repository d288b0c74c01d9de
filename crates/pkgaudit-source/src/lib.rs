//! Filesystem adapters: find and parse policy documents, load package inventories, and
//! identify the host from `os-release`.
//!
//! This crate does filesystem IO but never spawns processes; querying the live package
//! manager is left to the caller (typically the CLI).

#![forbid(unsafe_code)]

mod discover;
mod error;
mod fingerprint;
mod inventory;
mod policy;

pub use discover::discover_policy_files;
pub use error::SourceError;
pub use fingerprint::{DEFAULT_OS_RELEASE, OsReleaseFingerprint, fingerprint_from_os_release};
pub use inventory::{StaticInventory, load_inventory, parse_inventory_json};
pub use policy::{load_policies, load_policy_file, parse_policy_yaml};

/// Entry points that never panic on any input, for fuzzing and property tests.
pub mod fuzz {
    /// Parse arbitrary text as a policy document.
    pub fn parse_policy_yaml(text: &str) -> Result<(), crate::SourceError> {
        let _ = crate::policy::parse_policy_yaml(text)?;
        Ok(())
    }

    /// Derive a fingerprint from arbitrary `os-release` text.
    pub fn fingerprint_from_os_release(text: &str) -> Option<String> {
        crate::fingerprint::fingerprint_from_os_release(text)
    }
}
