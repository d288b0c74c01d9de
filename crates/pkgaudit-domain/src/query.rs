//! Collaborators the engine reads from: the package manager and the host identity.

use std::collections::{BTreeMap, HashMap};

/// Read-only view of the host's installed packages.
///
/// Calls must be side-effect free and stable for the duration of one audit. An empty
/// version string is treated the same as `None`.
pub trait PackageQuery {
    /// Installed version of `name`, or `None` when it is not installed.
    fn installed_version(&self, name: &str) -> Option<String>;
}

impl<T: PackageQuery + ?Sized> PackageQuery for &T {
    fn installed_version(&self, name: &str) -> Option<String> {
        (**self).installed_version(name)
    }
}

impl<T: PackageQuery + ?Sized> PackageQuery for Box<T> {
    fn installed_version(&self, name: &str) -> Option<String> {
        (**self).installed_version(name)
    }
}

impl PackageQuery for BTreeMap<String, String> {
    fn installed_version(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl PackageQuery for HashMap<String, String> {
    fn installed_version(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Adapts a closure into a [`PackageQuery`].
pub struct QueryFn<F>(pub F);

impl<F> PackageQuery for QueryFn<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn installed_version(&self, name: &str) -> Option<String> {
        (self.0)(name)
    }
}

/// Supplies the string that selects host-specific rule buckets (e.g. `CentOS Linux-7`).
pub trait HostFingerprintProvider {
    fn fingerprint(&self) -> String;
}

impl HostFingerprintProvider for str {
    fn fingerprint(&self) -> String {
        self.to_string()
    }
}

impl HostFingerprintProvider for String {
    fn fingerprint(&self) -> String {
        self.clone()
    }
}

impl<T: HostFingerprintProvider + ?Sized> HostFingerprintProvider for &T {
    fn fingerprint(&self) -> String {
        (**self).fingerprint()
    }
}
