//! Driver model traits and types for USB Type-C port controllers.
//!
//! This crate defines the contracts between a port-controller driver and the
//! platform around it:
//!
//! - **Resources** -- [`IrqLine`] / [`IrqRequest`] describing the interrupt a
//!   driver asks for, and [`BlockBus`] for framed bus access.
//! - **Identity** -- the [`Driver`] trait and [`DriverInfo`].
//! - **Collaborators** -- [`RoleSwitch`] (the data-role mux arbiter) and
//!   [`TypecPort`] (the port framework), both implemented by the platform.
//! - **Operations** -- [`DataRoleOps`] and [`ThreadedIrqHandler`], implemented
//!   by drivers and invoked by the platform.
//! - **Services** -- [`PlatformServices`], through which a driver acquires
//!   all of the above during probe.

#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod driver;
pub mod error;
pub mod resource;
pub mod services;
pub mod typec;

// Re-export all public types at the crate root for ergonomic imports.
pub use bus::{BlockBus, I2cBlockDevice, TransportError};
pub use driver::{Driver, DriverInfo};
pub use error::DriverError;
pub use resource::{IrqFlags, IrqLine, IrqRequest, ThreadedIrqHandler};
pub use services::PlatformServices;
pub use typec::{
    DataRole, DataRoleOps, DataRoles, PowerRoles, RoleSwitch, TypecCapability, TypecPort,
    UsbRole,
};
