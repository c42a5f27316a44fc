use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

use scanpack_config::Selectors;
use scanpack_lang::Language;
use scanpack_utils::error::{ConfigError, ScanPackError};
use scanpack_utils::paths::relative_to;

use crate::model::CandidateFile;

/// The candidate source files discovered under a project root.
///
/// Candidates are ordered entry-file-first, then by lexicographic relative
/// path. The ordering is deterministic and part of the contract: budget
/// truncation downstream depends on it.
#[derive(Debug)]
pub struct DiscoveredFiles {
    root: Utf8PathBuf,
    candidates: Vec<CandidateFile>,
    by_rel: HashMap<Utf8PathBuf, usize>,
    /// File name -> relative paths carrying that name, in path order.
    by_name: HashMap<String, Vec<Utf8PathBuf>>,
}

impl DiscoveredFiles {
    /// All candidates, entry first.
    #[must_use]
    pub fn candidates(&self) -> &[CandidateFile] {
        &self.candidates
    }

    /// Look up a candidate by exact relative path.
    #[must_use]
    pub fn get(&self, rel_path: &Utf8Path) -> Option<&CandidateFile> {
        self.by_rel.get(rel_path).map(|&i| &self.candidates[i])
    }

    /// Look up the first candidate (in path order) with the given file name.
    #[must_use]
    pub fn lookup_name(&self, name: &str) -> Option<&Utf8Path> {
        self.by_name
            .get(name)
            .and_then(|paths| paths.first())
            .map(Utf8PathBuf::as_path)
    }

    /// Absolute path of a candidate.
    #[must_use]
    pub fn abs_path(&self, rel_path: &Utf8Path) -> Utf8PathBuf {
        self.root.join(rel_path)
    }

    /// Sum of byte lengths of all discovered candidates, independent of any
    /// budget.
    #[must_use]
    pub fn total_size_bytes(&self) -> u64 {
        self.candidates.iter().map(|c| c.size).sum()
    }
}

/// Walk the project tree and collect source files for `language`.
///
/// Files must match the language's extensions and pass the selector globs.
/// Files whose metadata cannot be read are excluded with a warning. The
/// entry file must itself be among the discovered candidates.
pub fn discover_source_files(
    root: &Utf8Path,
    entry_rel: &Utf8Path,
    language: Language,
    selectors: &Selectors,
) -> Result<DiscoveredFiles, ScanPackError> {
    let (include, exclude) = selectors.build_globsets()?;

    let mut candidates = Vec::new();
    for dir_entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !dir_entry.file_type().is_file() {
            continue;
        }
        let Ok(abs_path) = Utf8PathBuf::try_from(dir_entry.path().to_path_buf()) else {
            tracing::warn!("Skipping non-UTF-8 path: {}", dir_entry.path().display());
            continue;
        };
        let Some(rel_path) = relative_to(&abs_path, root) else {
            continue;
        };
        let is_source = rel_path
            .extension()
            .is_some_and(|ext| language.extensions().contains(&ext));
        if !is_source {
            continue;
        }
        if !include.is_match(rel_path.as_str()) || exclude.is_match(rel_path.as_str()) {
            continue;
        }
        let size = match dir_entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                tracing::warn!("Skipping unreadable candidate {rel_path}: {e}");
                continue;
            }
        };
        candidates.push(CandidateFile { rel_path, size });
    }

    candidates.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));

    // File-name index in path order, before the entry is hoisted, so bare
    // name lookups stay independent of which file triggered the scan.
    let mut by_name: HashMap<String, Vec<Utf8PathBuf>> = HashMap::new();
    for candidate in &candidates {
        if let Some(name) = candidate.rel_path.file_name() {
            by_name
                .entry(name.to_string())
                .or_default()
                .push(candidate.rel_path.clone());
        }
    }

    // Entry file seeds the traversal, so it sorts first.
    let entry_index = candidates
        .iter()
        .position(|c| c.rel_path == entry_rel)
        .ok_or_else(|| {
            ScanPackError::Config(ConfigError::EntryNotDiscovered {
                entry: entry_rel.to_string(),
            })
        })?;
    let entry = candidates.remove(entry_index);
    candidates.insert(0, entry);

    let by_rel = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| (c.rel_path.clone(), i))
        .collect();

    Ok(DiscoveredFiles {
        root: root.to_path_buf(),
        candidates,
        by_rel,
        by_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanpack_config::Config;

    fn write(root: &Utf8Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[test]
    fn discovers_only_language_sources_in_order() {
        let (_dir, root) = temp_root();
        write(&root, "zeta.rb", "a = 1\n");
        write(&root, "alpha.rb", "b = 2\n");
        write(&root, "helpers/helper.rb", "c = 3\n");
        write(&root, "README.md", "# not source\n");
        write(&root, "script.py", "d = 4\n");

        let config = Config::default();
        let discovered = discover_source_files(
            &root,
            Utf8Path::new("zeta.rb"),
            Language::Ruby,
            &config.selectors,
        )
        .unwrap();

        let rels: Vec<&str> = discovered
            .candidates()
            .iter()
            .map(|c| c.rel_path.as_str())
            .collect();
        // Entry first, the rest in path order.
        assert_eq!(rels, vec!["zeta.rb", "alpha.rb", "helpers/helper.rb"]);
    }

    #[test]
    fn entry_must_be_discovered() {
        let (_dir, root) = temp_root();
        write(&root, "main.rb", "a = 1\n");

        let config = Config::default();
        let err = discover_source_files(
            &root,
            Utf8Path::new("missing.rb"),
            Language::Ruby,
            &config.selectors,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ScanPackError::Config(ConfigError::EntryNotDiscovered { .. })
        ));
    }

    #[test]
    fn excluded_directories_are_skipped() {
        let (_dir, root) = temp_root();
        write(&root, "main.rb", "a = 1\n");
        write(&root, "vendor/gem.rb", "b = 2\n");

        let config = Config::default();
        let discovered = discover_source_files(
            &root,
            Utf8Path::new("main.rb"),
            Language::Ruby,
            &config.selectors,
        )
        .unwrap();
        assert_eq!(discovered.candidates().len(), 1);
    }

    #[test]
    fn total_size_sums_all_candidates() {
        let (_dir, root) = temp_root();
        write(&root, "main.rb", "12345");
        write(&root, "other.rb", "123");

        let config = Config::default();
        let discovered = discover_source_files(
            &root,
            Utf8Path::new("main.rb"),
            Language::Ruby,
            &config.selectors,
        )
        .unwrap();
        assert_eq!(discovered.total_size_bytes(), 8);
    }

    #[test]
    fn name_lookup_uses_path_order() {
        let (_dir, root) = temp_root();
        write(&root, "z/util.rb", "a\n");
        write(&root, "a/util.rb", "b\n");
        write(&root, "main.rb", "c\n");

        let config = Config::default();
        let discovered = discover_source_files(
            &root,
            Utf8Path::new("main.rb"),
            Language::Ruby,
            &config.selectors,
        )
        .unwrap();
        assert_eq!(
            discovered.lookup_name("util.rb"),
            Some(Utf8Path::new("a/util.rb"))
        );
    }
}
