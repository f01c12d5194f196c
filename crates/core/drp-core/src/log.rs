//! Leveled logging for the DRP driver stack.
//!
//! Drivers format messages with [`klog!`] or one of the per-level macros
//! (`kerr!`, `kwarn!`, `kinfo!`, `kdebug!`). The platform decides where
//! they go by installing a sink with [`set_log_fn`]; until it does, every
//! message is dropped. Levels above [`MAX_LOG_LEVEL`] are filtered before
//! the sink is consulted.

use core::fmt;
use core::sync::atomic::{AtomicPtr, Ordering};

use crate::config::MAX_LOG_LEVEL;

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

/// Message severity. Lower values are more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    /// The device is unusable.
    Fatal = 0,
    /// An operation failed; the device keeps running.
    Error = 1,
    /// Something unexpected that did not fail an operation.
    Warn = 2,
    /// Probe results and role changes.
    Info = 3,
    /// Register dumps.
    Debug = 4,
    /// Everything else.
    Trace = 5,
}

impl LogLevel {
    /// Five-character label, padded so columns line up.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fatal => "FATAL",
            Self::Error => "ERROR",
            Self::Warn => "WARN ",
            Self::Info => "INFO ",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().trim_end())
    }
}

/// Returns `true` if `level` survives the build-time filter.
#[inline]
#[must_use]
pub const fn enabled(level: LogLevel) -> bool {
    level as u8 <= MAX_LOG_LEVEL as u8
}

// ---------------------------------------------------------------------------
// Records and the sink
// ---------------------------------------------------------------------------

/// One formatted-on-demand log message.
#[derive(Clone, Copy)]
pub struct Record<'a> {
    /// Severity.
    pub level: LogLevel,
    /// Module the message was logged from.
    pub module: &'static str,
    /// Message body.
    pub args: fmt::Arguments<'a>,
}

/// A log sink installed by the platform.
pub type LogFn = fn(&Record<'_>);

fn discard(_record: &Record<'_>) {}

static SINK: AtomicPtr<()> = AtomicPtr::new(discard as *mut ());

/// Installs the log sink, replacing any earlier one.
///
/// # Safety
///
/// `f` may be called concurrently from any thread that runs driver code,
/// including platform interrupt threads, and must tolerate that.
pub unsafe fn set_log_fn(f: LogFn) {
    SINK.store(f as *mut (), Ordering::Release);
}

#[inline]
fn sink() -> LogFn {
    let ptr = SINK.load(Ordering::Acquire);
    // SAFETY: Only `LogFn` values are ever stored in SINK.
    unsafe { core::mem::transmute::<*mut (), LogFn>(ptr) }
}

/// Backend of [`klog!`].
#[doc(hidden)]
pub fn _log(level: LogLevel, module: &'static str, args: fmt::Arguments<'_>) {
    if enabled(level) {
        sink()(&Record {
            level,
            module,
            args,
        });
    }
}

// ---------------------------------------------------------------------------
// Macros
// ---------------------------------------------------------------------------

/// Logs a message at an explicit level.
#[macro_export]
macro_rules! klog {
    ($level:expr, $($arg:tt)*) => {
        $crate::log::_log($level, module_path!(), format_args!($($arg)*))
    };
}

/// Logs at [`LogLevel::Error`](crate::log::LogLevel::Error).
#[macro_export]
macro_rules! kerr {
    ($($arg:tt)*) => { $crate::klog!($crate::log::LogLevel::Error, $($arg)*) };
}

/// Logs at [`LogLevel::Warn`](crate::log::LogLevel::Warn).
#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)*) => { $crate::klog!($crate::log::LogLevel::Warn, $($arg)*) };
}

/// Logs at [`LogLevel::Info`](crate::log::LogLevel::Info).
#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)*) => { $crate::klog!($crate::log::LogLevel::Info, $($arg)*) };
}

/// Logs at [`LogLevel::Debug`](crate::log::LogLevel::Debug).
#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)*) => { $crate::klog!($crate::log::LogLevel::Debug, $($arg)*) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static CAPTURED: Mutex<Vec<(LogLevel, &'static str, String)>> = Mutex::new(Vec::new());

    fn capture(record: &Record<'_>) {
        CAPTURED
            .lock()
            .unwrap()
            .push((record.level, record.module, record.args.to_string()));
    }

    #[test]
    fn labels_line_up() {
        for level in [
            LogLevel::Fatal,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ] {
            assert_eq!(level.name().len(), 5);
        }
        assert_eq!(format!("{}", LogLevel::Warn), "WARN");
    }

    #[test]
    fn fatal_is_most_severe_and_always_enabled() {
        assert!(LogLevel::Fatal < LogLevel::Error);
        assert!(LogLevel::Debug < LogLevel::Trace);
        assert!(enabled(LogLevel::Fatal));
    }

    #[test]
    fn sink_receives_level_module_and_text() {
        // SAFETY: `capture` only takes a std mutex.
        unsafe { set_log_fn(capture) };

        crate::kerr!("register write failed: {}", 5);
        crate::kinfo!("usb role {}", "HOST");
        crate::klog!(LogLevel::Trace, "frame {:02x}", 0x1d);

        let captured = CAPTURED.lock().unwrap();
        let seen = |level: LogLevel, text: &str| {
            captured.iter().any(|(l, module, m)| {
                *l == level && *module == "drp_core::log::tests" && m == text
            })
        };
        assert_eq!(seen(LogLevel::Error, "register write failed: 5"), enabled(LogLevel::Error));
        assert_eq!(seen(LogLevel::Info, "usb role HOST"), enabled(LogLevel::Info));
        assert_eq!(seen(LogLevel::Trace, "frame 1d"), enabled(LogLevel::Trace));
    }
}
