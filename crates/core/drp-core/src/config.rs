//! Compile-time configuration.
//!
//! Values are taken from the build environment so a platform image can pick
//! its verbosity without code changes:
//!
//! ```text
//! DRP_LOG_LEVEL=info cargo build
//! ```

use crate::log::LogLevel;

/// Maximum log level (compile-time). Messages more verbose than this are
/// discarded before they are formatted.
pub const MAX_LOG_LEVEL: LogLevel = match option_env!("DRP_LOG_LEVEL") {
    Some(level) => parse_log_level(level),
    None => LogLevel::Debug,
};

/// Parses a log level name as accepted by `DRP_LOG_LEVEL`.
///
/// Unknown names fall back to [`LogLevel::Debug`].
#[must_use]
pub const fn parse_log_level(name: &str) -> LogLevel {
    match name.as_bytes() {
        b"fatal" => LogLevel::Fatal,
        b"error" => LogLevel::Error,
        b"warn" => LogLevel::Warn,
        b"info" => LogLevel::Info,
        b"trace" => LogLevel::Trace,
        _ => LogLevel::Debug,
    }
}
