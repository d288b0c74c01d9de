use crate::error::SourceError;
use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

/// Policy files under `root`.
///
/// A file is returned as-is whatever its extension. A directory is walked recursively for
/// `*.yaml` / `*.yml` files, returned in lexicographic path order so merges are stable.
pub fn discover_policy_files(root: &Utf8Path) -> Result<Vec<Utf8PathBuf>, SourceError> {
    let meta = std::fs::metadata(root).map_err(|source| SourceError::Read {
        path: root.to_owned(),
        source,
    })?;
    if meta.is_file() {
        return Ok(vec![root.to_owned()]);
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| SourceError::Walk {
            root: root.to_owned(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = Utf8PathBuf::from_path_buf(entry.into_path()).map_err(|path| {
            SourceError::NonUtf8Path {
                path: path.display().to_string(),
            }
        })?;
        if is_policy_file(&path) {
            out.push(path);
        }
    }

    out.sort();
    tracing::debug!(root = %root, files = out.len(), "discovered policy files");
    Ok(out)
}

fn is_policy_file(path: &Utf8Path) -> bool {
    matches!(path.extension(), Some("yaml" | "yml"))
}
