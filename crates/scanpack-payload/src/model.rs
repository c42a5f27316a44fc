use std::time::Duration;

use camino::Utf8PathBuf;
use serde::Serialize;

use scanpack_lang::Language;

/// A discovered candidate file; content is not read until inclusion time.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Path relative to the project root.
    pub rel_path: Utf8PathBuf,
    /// Byte length reported by the filesystem.
    pub size: u64,
}

/// A file selected into the payload, with its content loaded.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path relative to the project root.
    pub rel_path: Utf8PathBuf,
    /// Byte length reported by the filesystem.
    pub size: u64,
    /// Number of lines, counted the way `str::lines` counts them: a
    /// trailing newline does not add a line.
    pub line_count: u64,
    /// Raw file bytes, written verbatim into the archive.
    pub content: Vec<u8>,
}

/// Aggregate description of an assembled payload.
///
/// Invariant: `payload_bytes` and `total_lines` are the sums over exactly
/// the files in `files`, and `payload_bytes` never exceeds the configured
/// byte budget.
#[derive(Debug, Clone, Serialize)]
pub struct PayloadMetadata {
    /// Included files in insertion order, relative to the project root.
    pub files: Vec<Utf8PathBuf>,
    /// Total byte size of the included files.
    pub payload_bytes: u64,
    /// Total line count of the included files.
    pub total_lines: u64,
    /// The scanned language.
    pub language: Language,
    /// True when the budget excluded at least one otherwise-reachable file.
    pub truncated: bool,
}

impl PayloadMetadata {
    /// Number of included files.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.files.len()
    }
}

/// An assembled payload: metadata plus the serialized zip archive.
///
/// The archive contains one entry per included file, named by its relative
/// path. Constructed fresh per scan request and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Payload {
    pub metadata: PayloadMetadata,
    /// Serialized zip bytes.
    pub archive: Vec<u8>,
    /// Elapsed build time.
    pub duration: Duration,
}

/// Count lines in raw bytes with `str::lines` semantics.
pub(crate) fn count_lines(content: &[u8]) -> u64 {
    match content.last() {
        None => 0,
        Some(&last) => {
            let newlines = content.iter().filter(|&&b| b == b'\n').count() as u64;
            if last == b'\n' { newlines } else { newlines + 1 }
        }
    }
}
