//! The error type shared by drivers and platform collaborators.

use core::fmt;

/// Why a driver-model operation failed.
///
/// Platform services report acquisition failures with it, collaborators
/// report rejected requests with it, and drivers fold their own errors into
/// it at the framework boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// A device or collaborator the driver needs is absent.
    DeviceNotFound,
    /// A platform resource could not be set up.
    InitFailed,
    /// The bus transfer to the device failed.
    IoError,
    /// The request does not fit the current state of the target.
    InvalidState,
    /// The driver's configuration was rejected before touching hardware.
    InvalidConfig,
}

impl DriverError {
    /// Short lowercase description, as used by [`Display`](fmt::Display).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeviceNotFound => "device not found",
            Self::InitFailed => "resource setup failed",
            Self::IoError => "bus transfer failed",
            Self::InvalidState => "request does not fit current state",
            Self::InvalidConfig => "configuration rejected",
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
