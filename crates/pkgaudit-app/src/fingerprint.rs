//! The `fingerprint` use case: decide which host buckets a run selects.

use anyhow::Context;
use camino::Utf8Path;
use pkgaudit_source::OsReleaseFingerprint;

#[derive(Clone, Debug)]
pub struct FingerprintInput<'a> {
    /// A literal fingerprint from config or the command line; wins when set.
    pub configured: Option<&'a str>,
    /// `os-release` file read when nothing is configured.
    pub os_release: &'a Utf8Path,
}

pub fn detect_fingerprint(input: FingerprintInput<'_>) -> anyhow::Result<String> {
    if let Some(fp) = input.configured.filter(|fp| !fp.is_empty()) {
        tracing::debug!(fingerprint = fp, "using configured fingerprint");
        return Ok(fp.to_string());
    }
    let detected = OsReleaseFingerprint::from_path(input.os_release)
        .with_context(|| format!("detect host fingerprint from {}", input.os_release))?;
    Ok(detected.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn configured_fingerprint_skips_detection() {
        let fp = detect_fingerprint(FingerprintInput {
            configured: Some("CentOS Linux-7"),
            os_release: Utf8Path::new("/nonexistent/os-release"),
        })
        .expect("configured");
        assert_eq!(fp, "CentOS Linux-7");
    }

    #[test]
    fn detects_from_os_release_file() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(tmp.path().join("os-release")).expect("utf8");
        std::fs::write(&path, "NAME=\"Ubuntu\"\nVERSION_ID=\"24.04\"\n").expect("write");

        let fp = detect_fingerprint(FingerprintInput {
            configured: Some(""),
            os_release: &path,
        })
        .expect("detect");
        assert_eq!(fp, "Ubuntu-24.04");
    }

    #[test]
    fn missing_os_release_is_an_error_with_context() {
        let err = detect_fingerprint(FingerprintInput {
            configured: None,
            os_release: Utf8Path::new("/nonexistent/os-release"),
        })
        .expect_err("missing file");
        assert!(format!("{err:#}").contains("detect host fingerprint from /nonexistent/os-release"));
    }
}
