//! Live package manager lookups.

use pkgaudit_domain::query::PackageQuery;
use pkgaudit_domain::version::loose_cmp;
use std::cell::RefCell;
use std::collections::HashMap;
use std::process::Command;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackageManager {
    Dpkg,
    Rpm,
}

impl PackageManager {
    fn program(self) -> &'static str {
        match self {
            PackageManager::Dpkg => "dpkg-query",
            PackageManager::Rpm => "rpm",
        }
    }

    fn command(self, name: &str) -> Command {
        let mut cmd = Command::new(self.program());
        match self {
            PackageManager::Dpkg => {
                cmd.args(["-W", "-f=${db:Status-Status}\t${Version}\n", name]);
            }
            PackageManager::Rpm => {
                cmd.args(["-q", "--qf", "%{VERSION}-%{RELEASE}\n", name]);
            }
        }
        cmd
    }

    /// Installed version from a successful query's stdout.
    ///
    /// A package can be installed more than once (kernels, multi-arch); the loosely
    /// highest version is reported.
    fn parse(self, stdout: &str) -> Option<String> {
        stdout
            .lines()
            .filter_map(|line| match self {
                // Removed packages keep a version while their config files linger.
                PackageManager::Dpkg => match line.split_once('\t') {
                    Some(("installed", version)) => Some(version),
                    _ => None,
                },
                PackageManager::Rpm => Some(line),
            })
            .map(str::trim)
            .filter(|version| !version.is_empty())
            .max_by(|a, b| loose_cmp(a, b))
            .map(str::to_string)
    }
}

/// Queries the host's package manager, caching one answer per package name.
#[derive(Debug)]
pub struct SystemPackageQuery {
    manager: PackageManager,
    cache: RefCell<HashMap<String, Option<String>>>,
}

impl SystemPackageQuery {
    /// The first supported package manager found on `PATH`.
    pub fn detect() -> Option<Self> {
        [PackageManager::Dpkg, PackageManager::Rpm]
            .into_iter()
            .find(|manager| {
                Command::new(manager.program())
                    .arg("--version")
                    .output()
                    .is_ok_and(|out| out.status.success())
            })
            .map(|manager| {
                tracing::debug!(?manager, "using system package manager");
                Self {
                    manager,
                    cache: RefCell::new(HashMap::new()),
                }
            })
    }

    fn query(&self, name: &str) -> Option<String> {
        let output = match self.manager.command(name).output() {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!(package = name, error = %err, "package query failed to run");
                return None;
            }
        };
        if !output.status.success() {
            return None;
        }
        self.manager.parse(&String::from_utf8_lossy(&output.stdout))
    }
}

impl PackageQuery for SystemPackageQuery {
    fn installed_version(&self, name: &str) -> Option<String> {
        if let Some(cached) = self.cache.borrow().get(name) {
            return cached.clone();
        }
        let version = self.query(name);
        tracing::trace!(package = name, ?version, "queried package manager");
        self.cache
            .borrow_mut()
            .insert(name.to_string(), version.clone());
        version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dpkg_output_requires_installed_status() {
        assert_eq!(
            PackageManager::Dpkg.parse("installed\t1:9.6p1-3ubuntu13"),
            Some("1:9.6p1-3ubuntu13".to_string())
        );
        assert_eq!(PackageManager::Dpkg.parse("config-files\t0.17-41"), None);
        assert_eq!(PackageManager::Dpkg.parse("not-installed\t"), None);
        assert_eq!(PackageManager::Dpkg.parse(""), None);
    }

    #[test]
    fn rpm_output_is_the_version() {
        assert_eq!(
            PackageManager::Rpm.parse("0.17-76.el7\n"),
            Some("0.17-76.el7".to_string())
        );
        assert_eq!(PackageManager::Rpm.parse(""), None);
    }

    #[test]
    fn rpm_output_with_multiple_versions() {
        let stdout = "3.10.0-1160.el7\n3.10.0-957.el7\n3.10.0-1062.el7\n";
        assert_eq!(
            PackageManager::Rpm.parse(stdout),
            Some("3.10.0-1160.el7".to_string())
        );
    }

    #[test]
    fn dpkg_output_with_multiple_architectures() {
        let stdout = "installed\t1.2.13-1\nconfig-files\t1.3.0-1\ninstalled\t1.2.14-1\n";
        assert_eq!(
            PackageManager::Dpkg.parse(stdout),
            Some("1.2.14-1".to_string())
        );
    }
}
