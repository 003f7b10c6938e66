//! Tracing and logging setup shared by every entry point.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{LogFormat, ParseLogFormatError};

/// Initialize process-wide tracing with JSON output at `info`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    self::tracing::init(LogFormat::Json, "info");
}

/// Initialize process-wide tracing with an explicit format and default level.
pub fn init_with(format: LogFormat, default_level: &str) {
    self::tracing::init(format, default_level);
}
