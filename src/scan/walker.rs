//! Recursive listing of candidate source files.

use std::path::Path;
use walkdir::WalkDir;

/// List files under `root/rel_dir` whose names end with one of `extensions`.
///
/// Returned paths are relative to `root` and always use `/` as separator,
/// so reports look the same on every platform. A missing directory is a
/// warning, not an error, and yields no files; unreadable entries are
/// logged and skipped.
pub fn walk(root: &Path, rel_dir: &str, extensions: &[String]) -> Vec<String> {
    let dir = root.join(rel_dir);
    if !dir.is_dir() {
        tracing::warn!("scan directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(&dir).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("skipping unreadable entry under {}: {}", dir.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !extensions
            .iter()
            .any(|ext| !ext.is_empty() && name.ends_with(ext.as_str()))
        {
            continue;
        }

        files.push(relative_path(root, entry.path()));
    }

    files
}

/// Root-relative, `/`-separated form of `path`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
