use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};

use scanpack_lang::Language;
use scanpack_utils::paths::normalize_rel;

use crate::discovery::DiscoveredFiles;

/// Extract candidate import paths from file content.
///
/// Applies the language's lexical rules line by line and deduplicates while
/// preserving first-seen order. Returns an empty list for files with no
/// recognizable local imports.
#[must_use]
pub fn parse_imports(content: &str, language: Language) -> Vec<String> {
    let mut candidates = Vec::new();
    for line in content.lines() {
        for candidate in language.import_candidates(line) {
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }
    candidates
}

/// Resolve candidate import paths to discovered files.
///
/// Each candidate is tried relative to the importing file's directory, then
/// relative to the project root, then as a bare file-name lookup anywhere
/// under the root. Candidates that resolve to nothing are silently dropped;
/// this is a best-effort heuristic, not exhaustive static analysis.
/// Already-visited files (and the importing file itself) are excluded so
/// cyclic imports terminate.
#[must_use]
pub fn resolve_imported_files(
    importing: &Utf8Path,
    candidates: &[String],
    discovered: &DiscoveredFiles,
    visited: &HashSet<Utf8PathBuf>,
) -> Vec<Utf8PathBuf> {
    let importing_dir = importing.parent().unwrap_or(Utf8Path::new(""));

    let mut resolved: Vec<Utf8PathBuf> = Vec::new();
    for candidate in candidates {
        let candidate_path = Utf8Path::new(candidate);

        let found = normalize_rel(&importing_dir.join(candidate_path))
            .filter(|rel| discovered.get(rel).is_some())
            .or_else(|| {
                normalize_rel(candidate_path).filter(|rel| discovered.get(rel).is_some())
            })
            .or_else(|| {
                candidate_path
                    .file_name()
                    .and_then(|name| discovered.lookup_name(name))
                    .map(Utf8Path::to_path_buf)
            });

        let Some(rel) = found else {
            tracing::debug!("Import candidate '{candidate}' did not resolve, skipping");
            continue;
        };
        if rel.as_path() == importing || visited.contains(&rel) || resolved.contains(&rel) {
            continue;
        }
        resolved.push(rel);
    }
    resolved
}
