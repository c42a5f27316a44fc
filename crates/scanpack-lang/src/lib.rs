//! Language definitions for payload assembly.
//!
//! Each language carries its recognized source extensions and a lexical rule
//! for extracting local import identifiers from a single line of source. The
//! rules are deliberately best-effort: they are regular expressions over
//! lines, not a semantic import resolver. An identifier that fails to
//! resolve to a file under the project root is simply dropped downstream.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The target language of a scan.
///
/// Determines which files count as source during discovery and which import
/// syntax is recognized when following dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ruby,
    Python,
    JavaScript,
    TypeScript,
    Java,
}

static RUBY_REQUIRE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(?:require_relative|require|load)\s+['"]([^'"]+)['"]"#).unwrap()
});

static PYTHON_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*import\s+([\w.]+(?:\s*,\s*[\w.]+)*)").unwrap());

static PYTHON_FROM_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*from\s+([.\w]+)\s+import\b").unwrap());

static JS_IMPORT_FROM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:import|export)\s+(?:[^'";]*?\s+from\s+)?['"]([^'"]+)['"]"#).unwrap()
});

static JS_REQUIRE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

static JAVA_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*import\s+(?:static\s+)?([A-Za-z_][\w.]*?)(\.\*)?\s*;").unwrap());

impl Language {
    /// The canonical lowercase name, used in metadata and CLI arguments.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ruby => "ruby",
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Java => "java",
        }
    }

    /// File extensions recognized as source for this language.
    #[must_use]
    pub const fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Ruby => &["rb"],
            Self::Python => &["py"],
            Self::JavaScript => &["js", "jsx"],
            Self::TypeScript => &["ts", "tsx"],
            Self::Java => &["java"],
        }
    }

    /// Detect the language from a file extension, if recognized.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "rb" => Some(Self::Ruby),
            "py" => Some(Self::Python),
            "js" | "jsx" => Some(Self::JavaScript),
            "ts" | "tsx" => Some(Self::TypeScript),
            "java" => Some(Self::Java),
            _ => None,
        }
    }

    /// Extract candidate import paths from a single source line.
    ///
    /// Returns the relative paths this line's import may resolve to under
    /// the language's conventions. A nested identifier contributes both the
    /// nested path and a bare-filename variant where the language supports
    /// loading by short name (Ruby load paths, Java same-package types).
    /// External or package imports yield no candidates.
    #[must_use]
    pub fn import_candidates(&self, line: &str) -> Vec<String> {
        match self {
            Self::Ruby => ruby_candidates(line),
            Self::Python => python_candidates(line),
            Self::JavaScript | Self::TypeScript => js_candidates(line, self.extensions()),
            Self::Java => java_candidates(line),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ruby" | "rb" => Ok(Self::Ruby),
            "python" | "py" => Ok(Self::Python),
            "javascript" | "js" => Ok(Self::JavaScript),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "java" => Ok(Self::Java),
            other => Err(format!("unknown language: '{other}'")),
        }
    }
}

fn push_unique(candidates: &mut Vec<String>, candidate: String) {
    if !candidates.contains(&candidate) {
        candidates.push(candidate);
    }
}

fn ruby_candidates(line: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    if let Some(caps) = RUBY_REQUIRE.captures(line) {
        let ident = caps[1].trim_end_matches(".rb");
        push_unique(&mut candidates, format!("{ident}.rb"));
        if let Some((_, basename)) = ident.rsplit_once('/') {
            push_unique(&mut candidates, format!("{basename}.rb"));
        }
    }
    candidates
}

fn python_candidates(line: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    let mut modules: Vec<&str> = Vec::new();
    if let Some(caps) = PYTHON_FROM_IMPORT.captures(line) {
        modules.push(caps.get(1).unwrap().as_str());
    } else if let Some(caps) = PYTHON_IMPORT.captures(line) {
        modules.extend(caps.get(1).unwrap().as_str().split(',').map(str::trim));
    }
    for module in modules {
        // Leading dots mark relative imports; the path convention is the
        // same once stripped.
        let module = module.trim_start_matches('.');
        if module.is_empty() {
            continue;
        }
        let path = module.replace('.', "/");
        push_unique(&mut candidates, format!("{path}.py"));
        if let Some((_, basename)) = path.rsplit_once('/') {
            push_unique(&mut candidates, format!("{basename}.py"));
        }
    }
    candidates
}

fn js_candidates(line: &str, extensions: &[&str]) -> Vec<String> {
    let mut candidates = Vec::new();
    let specifiers = JS_IMPORT_FROM
        .captures_iter(line)
        .chain(JS_REQUIRE.captures_iter(line))
        .map(|caps| caps.get(1).unwrap().as_str().to_string());
    for specifier in specifiers {
        // Bare specifiers are package imports, never local files.
        if !specifier.starts_with('.') {
            continue;
        }
        let trimmed = specifier.strip_prefix("./").unwrap_or(&specifier);
        let has_extension = trimmed
            .rsplit('/')
            .next()
            .is_some_and(|name| name.contains('.'));
        if has_extension {
            push_unique(&mut candidates, trimmed.to_string());
        } else {
            for ext in extensions {
                push_unique(&mut candidates, format!("{trimmed}.{ext}"));
            }
        }
    }
    candidates
}

fn java_candidates(line: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    if let Some(caps) = JAVA_IMPORT.captures(line) {
        // Wildcard imports carry no type name to resolve.
        if caps.get(2).is_some() {
            return candidates;
        }
        let path = caps[1].replace('.', "/");
        push_unique(&mut candidates, format!("{path}.java"));
        if let Some((_, basename)) = path.rsplit_once('/') {
            push_unique(&mut candidates, format!("{basename}.java"));
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ruby_require_yields_nested_and_bare_candidates() {
        let lang = Language::Ruby;
        assert_eq!(lang.import_candidates("require 'utils'"), vec!["utils.rb"]);
        assert_eq!(
            lang.import_candidates("require 'helpers/helper'"),
            vec!["helpers/helper.rb", "helper.rb"]
        );
        assert_eq!(
            lang.import_candidates("require_relative 'lib/config'"),
            vec!["lib/config.rb", "config.rb"]
        );
        assert_eq!(lang.import_candidates("load 'setup.rb'"), vec!["setup.rb"]);
    }

    #[test]
    fn ruby_ignores_non_import_lines() {
        let lang = Language::Ruby;
        assert!(lang.import_candidates("a = Utils.add(1, 2)").is_empty());
        assert!(lang.import_candidates("# require 'commented'").is_empty());
    }

    #[test]
    fn python_import_forms() {
        let lang = Language::Python;
        assert_eq!(lang.import_candidates("import utils"), vec!["utils.py"]);
        assert_eq!(
            lang.import_candidates("import pkg.helper"),
            vec!["pkg/helper.py", "helper.py"]
        );
        assert_eq!(
            lang.import_candidates("from pkg.helper import subtract"),
            vec!["pkg/helper.py", "helper.py"]
        );
        assert_eq!(
            lang.import_candidates("from .sibling import thing"),
            vec!["sibling.py"]
        );
        assert_eq!(
            lang.import_candidates("import os, utils"),
            vec!["os.py", "utils.py"]
        );
    }

    #[test]
    fn javascript_relative_specifiers_only() {
        let lang = Language::JavaScript;
        assert_eq!(
            lang.import_candidates("import { add } from './utils'"),
            vec!["utils.js", "utils.jsx"]
        );
        assert_eq!(
            lang.import_candidates("const h = require('./helpers/helper.js')"),
            vec!["helpers/helper.js"]
        );
        assert!(lang.import_candidates("import React from 'react'").is_empty());
        assert_eq!(
            lang.import_candidates("export { x } from '../shared'"),
            vec!["../shared.js", "../shared.jsx"]
        );
    }

    #[test]
    fn typescript_uses_its_own_extensions() {
        let lang = Language::TypeScript;
        assert_eq!(
            lang.import_candidates("import { add } from './utils'"),
            vec!["utils.ts", "utils.tsx"]
        );
    }

    #[test]
    fn java_import_forms() {
        let lang = Language::Java;
        assert_eq!(
            lang.import_candidates("import com.example.Helper;"),
            vec!["com/example/Helper.java", "Helper.java"]
        );
        assert!(lang.import_candidates("import java.util.*;").is_empty());
        assert_eq!(
            lang.import_candidates("import static com.example.Util;"),
            vec!["com/example/Util.java", "Util.java"]
        );
    }

    #[test]
    fn language_round_trips_through_strings() {
        for lang in [
            Language::Ruby,
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
            Language::Java,
        ] {
            assert_eq!(lang.as_str().parse::<Language>().unwrap(), lang);
        }
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn extension_detection() {
        assert_eq!(Language::from_extension("rb"), Some(Language::Ruby));
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("md"), None);
    }
}
