//! UTF-8 path helpers for discovery and archive entry naming.
//!
//! All payload-facing paths are relative to the project root and use
//! forward-slash separators in archive entry names, independent of platform.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Create a directory and all parent directories, tolerating benign races.
pub fn ensure_dir_all(path: &Utf8Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {path}"))?;
    Ok(())
}

/// Compute `path` relative to `root`, if `path` lives under it.
#[must_use]
pub fn relative_to(path: &Utf8Path, root: &Utf8Path) -> Option<Utf8PathBuf> {
    path.strip_prefix(root).ok().map(Utf8Path::to_path_buf)
}

/// Lexically normalize a relative path: resolve `.` and `..` components.
///
/// Returns `None` when the path would escape its root (leading `..` after
/// normalization) or is absolute. Symlinks are not resolved; this is a
/// purely lexical operation used for import candidate resolution.
#[must_use]
pub fn normalize_rel(path: &Utf8Path) -> Option<Utf8PathBuf> {
    if path.is_absolute() {
        return None;
    }
    let mut parts: Vec<&str> = Vec::new();
    for component in path.components() {
        match component {
            camino::Utf8Component::CurDir => {}
            camino::Utf8Component::ParentDir => {
                parts.pop()?;
            }
            camino::Utf8Component::Normal(part) => parts.push(part),
            camino::Utf8Component::RootDir | camino::Utf8Component::Prefix(_) => return None,
        }
    }
    Some(parts.iter().copied().collect())
}

/// Render a relative path as a zip entry name with forward-slash separators.
#[must_use]
pub fn archive_entry_name(rel_path: &Utf8Path) -> String {
    // Utf8Path on Windows still renders with backslashes; entry names are
    // required to use forward slashes in the standard zip layout.
    rel_path.as_str().replace('\\', "/")
}
