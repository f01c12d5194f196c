//! USB Type-C port framework types and collaborator contracts.
//!
//! A port controller driver sits between two external components it does
//! not implement: the USB role switch (the mux that actually routes the data
//! lines to the host or device controller) and the Type-C port framework
//! (which tracks the port's negotiated roles for the rest of the system).

use core::fmt;

use bitflags::bitflags;

use crate::error::DriverError;

/// Role of the local USB controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsbRole {
    /// No partner; data lines disconnected.
    None,
    /// Local controller acts as USB host.
    Host,
    /// Local controller acts as USB device.
    Device,
}

impl fmt::Display for UsbRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("NONE"),
            Self::Host => f.write_str("HOST"),
            Self::Device => f.write_str("DEVICE"),
        }
    }
}

/// Data role of a Type-C port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataRole {
    /// Downstream-facing (host).
    Host,
    /// Upstream-facing (device).
    Device,
}

impl From<DataRole> for UsbRole {
    fn from(role: DataRole) -> Self {
        match role {
            DataRole::Host => Self::Host,
            DataRole::Device => Self::Device,
        }
    }
}

bitflags! {
    /// Power roles a port can take.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PowerRoles: u8 {
        /// Supplies VBUS.
        const SOURCE = 1 << 0;
        /// Draws VBUS.
        const SINK   = 1 << 1;
    }
}

bitflags! {
    /// Data roles a port can take.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DataRoles: u8 {
        /// Downstream-facing.
        const HOST   = 1 << 0;
        /// Upstream-facing.
        const DEVICE = 1 << 1;
    }
}

/// Port descriptor registered with the port framework.
///
/// A port with both power roles is a dual-role power port; one with both
/// data roles is a dual-role data port. Ports register without a preferred
/// role; a controller steers the preference per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypecCapability {
    /// Power roles the port supports.
    pub power: PowerRoles,
    /// Data roles the port supports.
    pub data: DataRoles,
}

/// The USB role switch arbiter.
pub trait RoleSwitch: Send + Sync {
    /// Routes the data lines for `role`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] if the mux could not be switched.
    fn set_role(&self, role: UsbRole) -> Result<(), DriverError>;
}

/// A port registered with the Type-C port framework.
pub trait TypecPort: Send + Sync {
    /// Reports the port's current data role to the framework.
    fn set_data_role(&self, role: DataRole);
}

/// Data-role operations a port controller offers to the framework.
pub trait DataRoleOps: Send + Sync {
    /// Asks the controller to move the port to `role`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] if the controller could not apply the role.
    fn dr_set(&self, role: DataRole) -> Result<(), DriverError>;
}
