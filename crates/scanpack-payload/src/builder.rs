use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use camino::{Utf8Path, Utf8PathBuf};

use scanpack_config::{Config, PayloadLimits, Selectors};
use scanpack_lang::Language;
use scanpack_utils::error::{ConfigError, ScanPackError};
use scanpack_utils::paths::relative_to;

use crate::archive::write_archive;
use crate::budget::PayloadBudget;
use crate::discovery::{DiscoveredFiles, discover_source_files};
use crate::imports::{parse_imports, resolve_imported_files};
use crate::model::{Payload, PayloadMetadata, SourceFile, count_lines};

/// Assembles size-bounded scan payloads for one project root and entry file.
///
/// The builder is configured once and can run any number of build calls;
/// each call is an independent, single-pass traversal with no carried-over
/// state. The entry file is always prioritized for inclusion: it seeds the
/// import traversal, and a build fails outright when the entry alone
/// exceeds the byte budget.
#[derive(Debug)]
pub struct PayloadBuilder {
    root: Utf8PathBuf,
    entry_rel: Utf8PathBuf,
    language: Language,
    limits: PayloadLimits,
    selectors: Selectors,
    cancel: Option<Arc<AtomicBool>>,
}

impl PayloadBuilder {
    /// Create a builder with default configuration.
    ///
    /// The language is detected from the entry file's extension. The entry
    /// path may be absolute or relative to `root`, but must live under it.
    pub fn new(root: &Utf8Path, entry: &Utf8Path) -> Result<Self, ScanPackError> {
        Self::with_config(root, entry, &Config::default())
    }

    /// Create a builder from a resolved [`Config`].
    pub fn with_config(
        root: &Utf8Path,
        entry: &Utf8Path,
        config: &Config,
    ) -> Result<Self, ScanPackError> {
        let root = root.canonicalize_utf8()?;
        let entry_abs = if entry.is_absolute() {
            entry.to_path_buf()
        } else {
            root.join(entry)
        };
        let entry_abs = entry_abs.canonicalize_utf8()?;
        let entry_rel = relative_to(&entry_abs, &root).ok_or_else(|| {
            ScanPackError::Config(ConfigError::EntryOutsideRoot {
                entry: entry_abs.to_string(),
                root: root.to_string(),
            })
        })?;

        let language = match config.language {
            Some(language) => language,
            None => entry_rel
                .extension()
                .and_then(Language::from_extension)
                .ok_or_else(|| {
                    ScanPackError::Config(ConfigError::UnknownLanguage(entry_rel.to_string()))
                })?,
        };

        Ok(Self {
            root,
            entry_rel,
            language,
            limits: config.limits,
            selectors: config.selectors.clone(),
            cancel: None,
        })
    }

    /// Override the payload limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: PayloadLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Attach a cooperative cancellation flag, checked between
    /// file-processing steps. When the flag becomes true the running build
    /// fails with [`ScanPackError::Cancelled`].
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// The scanned language.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// The configured byte budget.
    #[must_use]
    pub const fn payload_limit_bytes(&self) -> u64 {
        self.limits.max_bytes
    }

    /// The entry file, relative to the project root.
    #[must_use]
    pub fn entry_file(&self) -> &Utf8Path {
        &self.entry_rel
    }

    /// Discover candidate source files under the project root.
    pub fn discover(&self) -> Result<DiscoveredFiles, ScanPackError> {
        discover_source_files(&self.root, &self.entry_rel, self.language, &self.selectors)
    }

    /// Sum of byte lengths of all discovered source files, independent of
    /// the budget. Used for reporting, not for inclusion decisions.
    pub fn total_project_size_in_bytes(&self) -> Result<u64, ScanPackError> {
        Ok(self.discover()?.total_size_bytes())
    }

    /// Extract candidate import paths from one discovered file.
    pub fn parse_imports(&self, rel_path: &Utf8Path) -> Result<Vec<String>, ScanPackError> {
        let content = std::fs::read(self.root.join(rel_path))?;
        Ok(parse_imports(
            &String::from_utf8_lossy(&content),
            self.language,
        ))
    }

    /// Resolve the files imported by one discovered file, excluding any in
    /// `visited`.
    pub fn resolve_imported_files(
        &self,
        rel_path: &Utf8Path,
        visited: &HashSet<Utf8PathBuf>,
    ) -> Result<Vec<Utf8PathBuf>, ScanPackError> {
        let discovered = self.discover()?;
        let candidates = self.parse_imports(rel_path)?;
        Ok(resolve_imported_files(
            rel_path,
            &candidates,
            &discovered,
            visited,
        ))
    }

    /// Traverse imports from the entry file and accumulate files under the
    /// budget, producing the payload metadata.
    pub fn include_dependencies(&self) -> Result<PayloadMetadata, ScanPackError> {
        let (files, truncated) = self.select_files()?;
        Ok(self.metadata_for(&files, truncated))
    }

    /// Assemble the full payload: traverse, then archive every included
    /// file.
    ///
    /// Fails with [`ScanPackError::PayloadSizeLimit`] when the entry file
    /// alone exceeds the budget; no partial artifact is produced in that
    /// case.
    pub fn create_payload(&self) -> Result<Payload, ScanPackError> {
        let started = Instant::now();

        let (files, truncated) = self.select_files()?;
        let archive = write_archive(&files)?;
        let metadata = self.metadata_for(&files, truncated);
        let duration = started.elapsed();

        tracing::info!(
            files = metadata.total_files(),
            bytes = metadata.payload_bytes,
            lines = metadata.total_lines,
            truncated = metadata.truncated,
            "Assembled {} payload in {duration:?}",
            self.language,
        );

        Ok(Payload {
            metadata,
            archive,
            duration,
        })
    }

    fn metadata_for(&self, files: &[SourceFile], truncated: bool) -> PayloadMetadata {
        PayloadMetadata {
            files: files.iter().map(|f| f.rel_path.clone()).collect(),
            payload_bytes: files.iter().map(|f| f.size).sum(),
            total_lines: files.iter().map(|f| f.line_count).sum(),
            language: self.language,
            truncated,
        }
    }

    fn check_cancelled(&self) -> Result<(), ScanPackError> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(ScanPackError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Select files for inclusion: a breadth-first traversal over import
    /// edges, seeded with the entry file first and then every other
    /// discovered file in discovery order, stopping before any file that
    /// would exceed the budget.
    fn select_files(&self) -> Result<(Vec<SourceFile>, bool), ScanPackError> {
        let discovered = self.discover()?;

        let entry = discovered
            .get(&self.entry_rel)
            .ok_or_else(|| {
                ScanPackError::Config(ConfigError::EntryNotDiscovered {
                    entry: self.entry_rel.to_string(),
                })
            })?;
        if entry.size > self.limits.max_bytes {
            return Err(ScanPackError::PayloadSizeLimit {
                path: entry.rel_path.to_string(),
                size: entry.size,
                limit: self.limits.max_bytes,
            });
        }

        let mut budget = PayloadBudget::new(self.limits);
        let mut included: Vec<SourceFile> = Vec::new();
        let mut seen: HashSet<Utf8PathBuf> = HashSet::new();
        let mut truncated = false;

        'seeds: for seed in discovered.candidates() {
            if seen.contains(&seed.rel_path) {
                continue;
            }
            seen.insert(seed.rel_path.clone());
            let mut queue = VecDeque::from([seed.rel_path.clone()]);

            while let Some(rel_path) = queue.pop_front() {
                self.check_cancelled()?;
                let Some(candidate) = discovered.get(&rel_path) else {
                    continue;
                };

                if budget.would_exceed(candidate.size) {
                    truncated = true;
                    break 'seeds;
                }

                let content = match std::fs::read(discovered.abs_path(&rel_path)) {
                    Ok(content) => content,
                    Err(e) if rel_path == self.entry_rel => return Err(e.into()),
                    Err(e) => {
                        tracing::warn!("Skipping unreadable source file {rel_path}: {e}");
                        continue;
                    }
                };

                budget.add_file(candidate.size);

                let candidates =
                    parse_imports(&String::from_utf8_lossy(&content), self.language);
                for import in
                    resolve_imported_files(&rel_path, &candidates, &discovered, &seen)
                {
                    seen.insert(import.clone());
                    queue.push_back(import);
                }

                included.push(SourceFile {
                    rel_path: candidate.rel_path.clone(),
                    size: candidate.size,
                    line_count: count_lines(&content),
                    content,
                });
            }
        }

        Ok((included, truncated))
    }
}
