use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use scanpack_utils::error::{ConfigError, ScanPackError};

/// Secret-material patterns that are always excluded from payloads.
///
/// The assembled archive leaves the developer's machine for the scanning
/// service, so key material and credential files must never be swept in by
/// a broad include pattern. These are enforced on top of any user-supplied
/// exclude list.
pub const ALWAYS_EXCLUDE_PATTERNS: &[&str] = &[
    "**/.env",
    "**/.env.*",
    "**/*.pem",
    "**/*.key",
    "**/*.pfx",
    "**/*.p12",
    "**/id_rsa",
    "**/id_ed25519",
    "**/.ssh/**",
    "**/.aws/**",
];

/// Include/exclude glob filters applied during source discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selectors {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for Selectors {
    fn default() -> Self {
        let mut exclude = vec![
            ".git/**".to_string(),
            "target/**".to_string(),
            "build/**".to_string(),
            "dist/**".to_string(),
            "node_modules/**".to_string(),
            "**/node_modules/**".to_string(),
            "vendor/**".to_string(),
            "**/.DS_Store".to_string(),
        ];
        exclude.extend(ALWAYS_EXCLUDE_PATTERNS.iter().map(|s| (*s).to_string()));

        Self {
            include: vec!["**/*".to_string()],
            exclude,
        }
    }
}

impl Selectors {
    /// Validate all glob patterns without building the matchers.
    pub fn validate(&self) -> Result<(), ScanPackError> {
        for pattern in &self.include {
            Glob::new(pattern).map_err(|e| {
                ScanPackError::Config(ConfigError::InvalidValue {
                    key: "selectors.include".to_string(),
                    value: format!("Invalid glob pattern '{pattern}': {e}"),
                })
            })?;
        }

        for pattern in &self.exclude {
            Glob::new(pattern).map_err(|e| {
                ScanPackError::Config(ConfigError::InvalidValue {
                    key: "selectors.exclude".to_string(),
                    value: format!("Invalid glob pattern '{pattern}': {e}"),
                })
            })?;
        }

        Ok(())
    }

    /// Build the compiled include and exclude matchers.
    ///
    /// The exclude set always contains [`ALWAYS_EXCLUDE_PATTERNS`] even when
    /// a config file replaced the default exclude list.
    pub fn build_globsets(&self) -> Result<(GlobSet, GlobSet), ScanPackError> {
        let mut include = GlobSetBuilder::new();
        for pattern in &self.include {
            include.add(Glob::new(pattern).map_err(|e| {
                ScanPackError::Config(ConfigError::InvalidValue {
                    key: "selectors.include".to_string(),
                    value: format!("Invalid glob pattern '{pattern}': {e}"),
                })
            })?);
        }

        let mut exclude = GlobSetBuilder::new();
        for pattern in self
            .exclude
            .iter()
            .map(String::as_str)
            .chain(ALWAYS_EXCLUDE_PATTERNS.iter().copied())
        {
            exclude.add(Glob::new(pattern).map_err(|e| {
                ScanPackError::Config(ConfigError::InvalidValue {
                    key: "selectors.exclude".to_string(),
                    value: format!("Invalid glob pattern '{pattern}': {e}"),
                })
            })?);
        }

        let include = include.build().map_err(|e| {
            ScanPackError::Config(ConfigError::InvalidValue {
                key: "selectors.include".to_string(),
                value: e.to_string(),
            })
        })?;
        let exclude = exclude.build().map_err(|e| {
            ScanPackError::Config(ConfigError::InvalidValue {
                key: "selectors.exclude".to_string(),
                value: e.to_string(),
            })
        })?;

        Ok((include, exclude))
    }
}
