//! scanpack - bounded code-scan payload assembler.
//!
//! Given a project root and an entry file, scanpack discovers source files,
//! follows local import statements transitively, accumulates files under a
//! configurable byte budget, and packages the selection into a zip archive
//! with size/line metadata for submission to a code-scanning service.
//!
//! # Example
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use scanpack::PayloadBuilder;
//!
//! let builder = PayloadBuilder::new(
//!     Utf8Path::new("/path/to/project"),
//!     Utf8Path::new("src/main.rb"),
//! )?;
//! let payload = builder.create_payload()?;
//! println!(
//!     "{} files, {} bytes, truncated: {}",
//!     payload.metadata.total_files(),
//!     payload.metadata.payload_bytes,
//!     payload.metadata.truncated,
//! );
//! # Ok::<(), scanpack::ScanPackError>(())
//! ```

pub mod cli;

pub use scanpack_config::{
    ALWAYS_EXCLUDE_PATTERNS, Config, DEFAULT_PAYLOAD_MAX_BYTES, Overrides, PayloadLimits,
    Selectors,
};
pub use scanpack_lang::Language;
pub use scanpack_payload::{
    CandidateFile, DiscoveredFiles, Payload, PayloadBudget, PayloadBuilder, PayloadMetadata,
    SourceFile,
};
pub use scanpack_utils::error::{ConfigError, ScanPackError};
pub use scanpack_utils::exit_codes::ExitCode;
