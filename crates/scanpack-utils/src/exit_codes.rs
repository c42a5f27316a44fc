//! Exit code constants for the scanpack CLI.
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Payload assembled successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 7 | `PAYLOAD_OVERFLOW` | Entry file exceeded the payload size budget |
//! | 10 | `CANCELLED` | Build cancelled via cooperative signal |

/// Exit codes matching the documented exit code table.
///
/// The numeric values are part of the public API and will not change in 0.x
/// releases. Use [`as_i32()`](Self::as_i32) for `std::process::exit()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - payload assembled successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// General/internal failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// Invalid or missing command-line arguments or configuration
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Entry file exceeded the payload size budget
    pub const PAYLOAD_OVERFLOW: ExitCode = ExitCode(7);

    /// Build cancelled via cooperative signal
    pub const CANCELLED: ExitCode = ExitCode(10);

    /// Get the numeric value for `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Construct from a raw exit code value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        Self(code)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_values_are_stable() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::INTERNAL.as_i32(), 1);
        assert_eq!(ExitCode::CLI_ARGS.as_i32(), 2);
        assert_eq!(ExitCode::PAYLOAD_OVERFLOW.as_i32(), 7);
        assert_eq!(ExitCode::CANCELLED.as_i32(), 10);
    }

    #[test]
    fn round_trips_through_i32() {
        assert_eq!(ExitCode::from_i32(7), ExitCode::PAYLOAD_OVERFLOW);
    }
}
