//! Platform service contracts for drivers.
//!
//! Drivers use [`PlatformServices`] to acquire the collaborators they need
//! during probe without depending on the platform directly. Every acquired
//! resource is an owned handle whose `Drop` releases it, so a probe that
//! fails halfway unwinds whatever it already holds, and a removed device
//! releases everything exactly once.

use crate::error::DriverError;
use crate::resource::IrqRequest;
use crate::typec::{RoleSwitch, TypecCapability, TypecPort};

/// Services a platform provides to port-controller drivers.
pub trait PlatformServices {
    /// Reference to the role switch. Dropping it puts the reference.
    type RoleSwitch: RoleSwitch;
    /// A registered framework port. Dropping it unregisters the port.
    type Port: TypecPort;
    /// A bound interrupt. Dropping it frees the line.
    type Irq;

    /// Looks up the role switch wired to this device's connector.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::DeviceNotFound`] if no connector or switch is
    /// described for the device.
    fn get_role_switch(&self) -> Result<Self::RoleSwitch, DriverError>;

    /// Registers a port with the Type-C framework.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] if the framework rejects the descriptor.
    fn register_port(&self, capability: &TypecCapability) -> Result<Self::Port, DriverError>;

    /// Binds a threaded interrupt handler.
    ///
    /// The platform delivers interrupts to the probed device through
    /// [`ThreadedIrqHandler`](crate::resource::ThreadedIrqHandler).
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] if the line cannot be bound.
    fn request_threaded_irq(&self, request: &IrqRequest) -> Result<Self::Irq, DriverError>;
}
