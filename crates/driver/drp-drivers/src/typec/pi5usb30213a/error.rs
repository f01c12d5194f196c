//! Controller error type.

use core::fmt;

use drp_driver_api::{DriverError, TransportError};

/// Errors reported by the PI5USB30213A driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerError {
    /// Reading the register file failed.
    Transport(TransportError),
    /// Writing a new port mode failed. The cached image was rolled back.
    ModeWrite(TransportError),
    /// No role switch is available for the connector.
    ArbiterUnavailable(DriverError),
    /// The role switch rejected a role.
    RoleSwitch(DriverError),
    /// The port framework rejected the port.
    PortRegistration(DriverError),
    /// The interrupt line could not be bound.
    IrqRequest(DriverError),
    /// The configuration is out of range.
    InvalidConfig(&'static str),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "register read failed: {e}"),
            Self::ModeWrite(e) => write!(f, "port mode write failed: {e}"),
            Self::ArbiterUnavailable(e) => write!(f, "role switch unavailable: {e}"),
            Self::RoleSwitch(e) => write!(f, "role switch rejected role: {e}"),
            Self::PortRegistration(e) => write!(f, "port registration failed: {e}"),
            Self::IrqRequest(e) => write!(f, "irq request failed: {e}"),
            Self::InvalidConfig(what) => write!(f, "invalid configuration: {what}"),
        }
    }
}

impl From<TransportError> for ControllerError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<ControllerError> for DriverError {
    fn from(e: ControllerError) -> Self {
        match e {
            ControllerError::Transport(_) | ControllerError::ModeWrite(_) => Self::IoError,
            ControllerError::ArbiterUnavailable(inner)
            | ControllerError::RoleSwitch(inner)
            | ControllerError::PortRegistration(inner)
            | ControllerError::IrqRequest(inner) => inner,
            ControllerError::InvalidConfig(_) => Self::InvalidConfig,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drp_driver_api::bus::ErrorKind;

    #[test]
    fn transport_errors_become_io_errors() {
        let short = TransportError::ShortTransfer {
            expected: 4,
            actual: 3,
        };
        assert_eq!(DriverError::from(ControllerError::from(short)), DriverError::IoError);
        assert_eq!(
            DriverError::from(ControllerError::ModeWrite(TransportError::Bus(ErrorKind::Bus))),
            DriverError::IoError
        );
    }

    #[test]
    fn collaborator_errors_pass_through() {
        assert_eq!(
            DriverError::from(ControllerError::ArbiterUnavailable(DriverError::DeviceNotFound)),
            DriverError::DeviceNotFound
        );
        assert_eq!(
            DriverError::from(ControllerError::InvalidConfig("settle delay")),
            DriverError::InvalidConfig
        );
    }

    #[test]
    fn display_names_the_failed_step() {
        let e = ControllerError::ModeWrite(TransportError::ShortTransfer {
            expected: 4,
            actual: 0,
        });
        assert_eq!(
            format!("{e}"),
            "port mode write failed: short transfer: 0/4 bytes"
        );
    }
}
