use crate::error::SourceError;
use camino::{Utf8Path, Utf8PathBuf};
use pkgaudit_domain::query::HostFingerprintProvider;

pub const DEFAULT_OS_RELEASE: &str = "/etc/os-release";

/// `NAME-RELEASE` from `os-release` content, e.g. `CentOS Linux-7` or `Ubuntu-22.04`.
///
/// Ubuntu keeps the full `VERSION_ID`; every other distribution uses its major component.
/// Without `VERSION_ID` the fingerprint is just `NAME`.
pub fn fingerprint_from_os_release(text: &str) -> Option<String> {
    let mut name = None;
    let mut version_id = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim() {
            "NAME" => name = Some(unquote(value)),
            "VERSION_ID" => version_id = Some(unquote(value)),
            _ => {}
        }
    }

    let name = name.filter(|n| !n.is_empty())?;
    let release = match version_id.as_deref() {
        None | Some("") => return Some(name),
        Some(v) if name.starts_with("Ubuntu") => v.to_string(),
        Some(v) => v.split('.').next().unwrap_or(v).to_string(),
    };
    Some(format!("{name}-{release}"))
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);
    inner.to_string()
}

/// Reads the host fingerprint from an `os-release` file.
#[derive(Clone, Debug)]
pub struct OsReleaseFingerprint {
    fingerprint: String,
}

impl OsReleaseFingerprint {
    pub fn detect() -> Result<Self, SourceError> {
        Self::from_path(Utf8Path::new(DEFAULT_OS_RELEASE))
    }

    pub fn from_path(path: &Utf8Path) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_owned(),
            source,
        })?;
        let fingerprint =
            fingerprint_from_os_release(&text).ok_or_else(|| SourceError::NoFingerprint {
                path: Utf8PathBuf::from(path),
            })?;
        tracing::debug!(path = %path, fingerprint, "detected host fingerprint");
        Ok(Self { fingerprint })
    }

    pub fn as_str(&self) -> &str {
        &self.fingerprint
    }
}

impl HostFingerprintProvider for OsReleaseFingerprint {
    fn fingerprint(&self) -> String {
        self.fingerprint.clone()
    }
}
