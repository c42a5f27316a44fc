use thiserror::Error;

use crate::exit_codes::ExitCode;

/// Library-level error type for scanpack operations.
///
/// `ScanPackError` is the primary error type returned by payload-building
/// operations. It provides detailed information for programmatic handling and
/// maps to CLI exit codes for consistent error reporting.
///
/// # Error Categories
///
/// | Category | Description |
/// |----------|-------------|
/// | `Config` | Configuration file or CLI argument errors |
/// | `PayloadSizeLimit` | The entry file alone exceeds the payload budget |
/// | `Cancelled` | A cooperative cancellation signal was observed |
/// | `Archive` | Zip serialization failure |
/// | `Io` | Filesystem failure on the project root or entry file |
///
/// # Exit Code Mapping
///
/// Use [`to_exit_code()`](Self::to_exit_code) to map errors to CLI exit
/// codes. Library code returns `ScanPackError` and does NOT call
/// `std::process::exit()`.
#[derive(Error, Debug)]
pub enum ScanPackError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(
        "Payload size limit exceeded: entry file '{path}' is {size} bytes, limit is {limit} bytes"
    )]
    PayloadSizeLimit { path: String, size: u64, limit: u64 },

    #[error("Payload build cancelled")]
    Cancelled,

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanPackError {
    /// Map this error to the documented CLI exit code.
    #[must_use]
    pub const fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::PayloadSizeLimit { .. } => ExitCode::PAYLOAD_OVERFLOW,
            Self::Cancelled => ExitCode::CANCELLED,
            Self::Archive(_) | Self::Io(_) => ExitCode::INTERNAL,
        }
    }
}

/// Configuration errors: bad files, bad values, bad CLI arguments.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config file: {0}")]
    InvalidFile(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Unknown language: '{0}'")]
    UnknownLanguage(String),

    #[error("Entry file '{entry}' is not under project root '{root}'")]
    EntryOutsideRoot { entry: String, root: String },

    #[error("Entry file '{entry}' was not discovered as a source file")]
    EntryNotDiscovered { entry: String },
}
