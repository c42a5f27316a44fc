//! Atomic file writes for payload artifacts.
//!
//! Writes go to a temporary file in the target directory, are fsynced, and
//! then renamed over the destination, so a crashed or cancelled build never
//! leaves a half-written archive behind.

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::io::Write;

use tempfile::NamedTempFile;

/// Atomically write bytes to a file using temp file + fsync + rename.
pub fn write_bytes_atomic(path: &Utf8Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create parent directory: {parent}"))?;
    }

    // Create the temp file next to the target so the rename stays on one
    // filesystem.
    let temp_dir = path.parent().unwrap_or_else(|| Utf8Path::new("."));
    let mut temp_file = NamedTempFile::new_in(temp_dir)
        .with_context(|| format!("Failed to create temporary file in: {temp_dir}"))?;

    temp_file
        .write_all(bytes)
        .with_context(|| format!("Failed to write {} bytes to temporary file", bytes.len()))?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file to disk")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to rename temporary file to: {path}"))?;

    Ok(())
}
