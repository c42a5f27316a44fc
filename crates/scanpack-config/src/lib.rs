//! Configuration for scanpack payload assembly.
//!
//! Provides hierarchical configuration with precedence CLI > file >
//! defaults. The optional TOML config file (`scanpack.toml` at the project
//! root, or an explicit path) supports `[payload]` and `[selectors]`
//! sections:
//!
//! ```toml
//! [payload]
//! max_bytes = 1048576
//! max_files = 500
//! language = "ruby"
//!
//! [selectors]
//! include = ["src/**"]
//! exclude = ["src/generated/**"]
//! ```

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use scanpack_lang::Language;
use scanpack_utils::error::{ConfigError, ScanPackError};

mod selectors;

pub use selectors::{ALWAYS_EXCLUDE_PATTERNS, Selectors};

/// Default payload size budget in bytes (1 MiB).
///
/// This is the platform constant the scanning service accepts per payload;
/// it can be lowered or raised per project via config or CLI.
pub const DEFAULT_PAYLOAD_MAX_BYTES: u64 = 1024 * 1024;

/// Size and count limits applied during dependency inclusion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PayloadLimits {
    /// Maximum cumulative byte size of included files.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    /// Optional maximum number of included files.
    #[serde(default)]
    pub max_files: Option<usize>,
}

const fn default_max_bytes() -> u64 {
    DEFAULT_PAYLOAD_MAX_BYTES
}

impl Default for PayloadLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_PAYLOAD_MAX_BYTES,
            max_files: None,
        }
    }
}

/// Resolved configuration for a payload build.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub limits: PayloadLimits,
    pub selectors: Selectors,
    /// Language override; when absent the language is detected from the
    /// entry file's extension.
    pub language: Option<Language>,
}

/// CLI-level overrides applied on top of file and default values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub max_bytes: Option<u64>,
    pub max_files: Option<usize>,
    pub language: Option<Language>,
}

/// On-disk shape of the config file. All sections are optional.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    payload: Option<PayloadSection>,
    #[serde(default)]
    selectors: Option<Selectors>,
}

#[derive(Debug, Default, Deserialize)]
struct PayloadSection {
    max_bytes: Option<u64>,
    max_files: Option<usize>,
    language: Option<Language>,
}

impl Config {
    /// Discover configuration for a project root.
    ///
    /// Reads `config_path` when given, otherwise `<root>/scanpack.toml` when
    /// present, otherwise built-in defaults; then applies `overrides` on
    /// top. An explicitly passed config path must exist; the conventional
    /// root file is optional.
    pub fn discover(
        root: &Utf8Path,
        config_path: Option<&Utf8Path>,
        overrides: &Overrides,
    ) -> Result<Self, ScanPackError> {
        let file = match config_path {
            Some(path) => Some(Self::read_file(path)?),
            None => {
                let conventional = root.join("scanpack.toml");
                if conventional.is_file() {
                    Some(Self::read_file(&conventional)?)
                } else {
                    None
                }
            }
        };

        let mut config = Self::default();
        if let Some(file) = file {
            if let Some(payload) = file.payload {
                if let Some(max_bytes) = payload.max_bytes {
                    config.limits.max_bytes = max_bytes;
                }
                if let Some(max_files) = payload.max_files {
                    config.limits.max_files = Some(max_files);
                }
                if let Some(language) = payload.language {
                    config.language = Some(language);
                }
            }
            if let Some(selectors) = file.selectors {
                config.selectors = selectors;
            }
        }

        if let Some(max_bytes) = overrides.max_bytes {
            config.limits.max_bytes = max_bytes;
        }
        if let Some(max_files) = overrides.max_files {
            config.limits.max_files = Some(max_files);
        }
        if let Some(language) = overrides.language {
            config.language = Some(language);
        }

        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Utf8Path) -> Result<ConfigFile, ScanPackError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScanPackError::Config(ConfigError::InvalidFile(format!("{path}: {e}")))
        })?;
        toml::from_str(&content)
            .map_err(|e| ScanPackError::Config(ConfigError::InvalidFile(format!("{path}: {e}"))))
    }

    /// Validate the resolved configuration.
    pub fn validate(&self) -> Result<(), ScanPackError> {
        if self.limits.max_bytes == 0 {
            return Err(ScanPackError::Config(ConfigError::InvalidValue {
                key: "payload.max_bytes".to_string(),
                value: "must be greater than zero".to_string(),
            }));
        }
        if self.limits.max_files == Some(0) {
            return Err(ScanPackError::Config(ConfigError::InvalidValue {
                key: "payload.max_files".to_string(),
                value: "must be greater than zero".to_string(),
            }));
        }
        self.selectors.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[test]
    fn defaults_when_no_file_present() {
        let (_dir, root) = temp_root();
        let config = Config::discover(&root, None, &Overrides::default()).unwrap();
        assert_eq!(config.limits.max_bytes, DEFAULT_PAYLOAD_MAX_BYTES);
        assert_eq!(config.limits.max_files, None);
        assert_eq!(config.language, None);
    }

    #[test]
    fn conventional_file_is_picked_up() {
        let (_dir, root) = temp_root();
        std::fs::write(
            root.join("scanpack.toml"),
            "[payload]\nmax_bytes = 4096\nlanguage = \"ruby\"\n",
        )
        .unwrap();

        let config = Config::discover(&root, None, &Overrides::default()).unwrap();
        assert_eq!(config.limits.max_bytes, 4096);
        assert_eq!(config.language, Some(Language::Ruby));
    }

    #[test]
    fn cli_overrides_win_over_file() {
        let (_dir, root) = temp_root();
        std::fs::write(root.join("scanpack.toml"), "[payload]\nmax_bytes = 4096\n").unwrap();

        let overrides = Overrides {
            max_bytes: Some(512),
            max_files: Some(3),
            language: Some(Language::Python),
        };
        let config = Config::discover(&root, None, &overrides).unwrap();
        assert_eq!(config.limits.max_bytes, 512);
        assert_eq!(config.limits.max_files, Some(3));
        assert_eq!(config.language, Some(Language::Python));
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let (_dir, root) = temp_root();
        let missing = root.join("nope.toml");
        let err = Config::discover(&root, Some(&missing), &Overrides::default()).unwrap_err();
        assert!(matches!(
            err,
            ScanPackError::Config(ConfigError::InvalidFile(_))
        ));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let (_dir, root) = temp_root();
        let path = root.join("scanpack.toml");
        std::fs::write(&path, "[payload\nmax_bytes = ").unwrap();
        let err = Config::discover(&root, None, &Overrides::default()).unwrap_err();
        assert!(matches!(
            err,
            ScanPackError::Config(ConfigError::InvalidFile(_))
        ));
    }

    #[test]
    fn zero_byte_budget_is_rejected() {
        let (_dir, root) = temp_root();
        let overrides = Overrides {
            max_bytes: Some(0),
            ..Overrides::default()
        };
        let err = Config::discover(&root, None, &overrides).unwrap_err();
        assert!(err.to_string().contains("max_bytes"));
    }

    #[test]
    fn custom_selectors_replace_defaults() {
        let (_dir, root) = temp_root();
        std::fs::write(
            root.join("scanpack.toml"),
            "[selectors]\ninclude = [\"src/**\"]\nexclude = [\"src/generated/**\"]\n",
        )
        .unwrap();

        let config = Config::discover(&root, None, &Overrides::default()).unwrap();
        assert_eq!(config.selectors.include, vec!["src/**".to_string()]);
        let (include, exclude) = config.selectors.build_globsets().unwrap();
        assert!(include.is_match("src/app.rb"));
        assert!(!include.is_match("lib/app.rb"));
        assert!(exclude.is_match("src/generated/schema.rb"));
    }
}
