//! Diodes PI5USB30213A USB Type-C DRP port controller driver.
//!
//! The PI5USB30213A detects cable attachment and orientation on a Type-C
//! connector and reports it through a four-byte register file that can only
//! be read or written as a whole. This driver keeps a cached copy of that
//! file, steers the port toward a data role on request, and follows the
//! cable through the INT_N interrupt, routing the data lines through the
//! platform's USB role switch.
//!
//! Both the role request path ([`DataRoleOps`]) and the interrupt path
//! ([`ThreadedIrqHandler`]) run their register access under one lock; the
//! role switch and the port framework are notified after it is released.
//!
//! Each register change carries the controller's generation. Notifications
//! are delivered by one thread at a time, always with the newest recorded
//! roles, so the collaborators end on the roles of the last register change
//! even when two paths release the lock in one order and notify in the
//! other. A collaborator that calls back into the driver from a
//! notification has its roles delivered by the running pass once it
//! returns.

use embedded_hal::delay::DelayNs;

use drp_core::sync::SpinLock;
use drp_driver_api::{
    DataRole, DataRoleOps, DataRoles, Driver, DriverError, DriverInfo, IrqFlags, IrqRequest,
    PlatformServices, PowerRoles, RoleSwitch, ThreadedIrqHandler, TransportError,
    TypecCapability, TypecPort, UsbRole,
};

pub mod config;
pub mod controller;
pub mod decode;
pub mod error;
pub mod irq;
pub mod regs;
pub mod transport;

#[cfg(test)]
mod mock;

pub use config::Config;
pub use controller::RoleSwitchController;
pub use decode::{
    Attachment, AttachmentStatus, ChargingCurrentStatus, PlugPolarity, RoleObservation, decode,
};
pub use error::ControllerError;
pub use irq::{DispatchState, InterruptDispatcher};
pub use regs::{ChargingCurrentRequest, PortMode, RegisterImage};
pub use transport::{BlockTransport, I2cTransport, RegisterTransport};

// ---------------------------------------------------------------------------
// Driver identity
// ---------------------------------------------------------------------------

/// Static driver metadata.
pub const DRIVER_INFO: DriverInfo = DriverInfo {
    name: "pi5usb30213a",
    compatible: "diodes,pi5usb30213a",
    description: "Diodes PI5USB30213A USB Type-C DRP port controller",
};

/// Port descriptor registered with the port framework.
const CAPABILITY: TypecCapability = TypecCapability {
    power: PowerRoles::SOURCE.union(PowerRoles::SINK),
    data: DataRoles::HOST.union(DataRoles::DEVICE),
};

/// Roles recorded for delivery, tagged with the change they came from.
#[derive(Clone, Copy)]
struct Publication {
    generation: u64,
    observation: RoleObservation,
}

// ---------------------------------------------------------------------------
// Pi5usb30213a
// ---------------------------------------------------------------------------

/// A probed PI5USB30213A.
///
/// Owns every resource acquired during [`probe`](Self::probe). Dropping the
/// device (see [`remove`](Self::remove)) frees the interrupt, unregisters
/// the port and puts the role switch, in that order.
pub struct Pi5usb30213a<T, D, S: PlatformServices> {
    // Fields drop in declaration order: the reverse of acquisition.
    /// Interrupt binding, if the platform wired INT_N.
    irq: Option<S::Irq>,
    /// Port framework registration.
    port: S::Port,
    /// USB role switch reference.
    role_sw: S::RoleSwitch,
    /// Transport, settle delay and register cache.
    state: SpinLock<RoleSwitchController<T, D>>,
    /// Interrupt pass serialization.
    dispatcher: InterruptDispatcher,
    /// Newest roles handed to the collaborators, or about to be.
    latest: SpinLock<Publication>,
    /// Notification pass serialization.
    notifier: InterruptDispatcher,
}

impl<T, D, S> Pi5usb30213a<T, D, S>
where
    T: RegisterTransport,
    D: DelayNs,
    S: PlatformServices,
{
    /// Brings up the device.
    ///
    /// Reads the register file, puts the port in DRP mode, acquires the
    /// role switch, registers the port, publishes the initial role and
    /// binds the interrupt if `config` names one. A failure at any step
    /// releases whatever the earlier steps acquired.
    ///
    /// # Errors
    ///
    /// Returns the [`ControllerError`] of the step that failed.
    pub fn probe(
        services: &S,
        transport: T,
        delay: D,
        config: &Config,
    ) -> Result<Self, ControllerError> {
        config.validate()?;

        let mut controller =
            RoleSwitchController::attach(transport, delay, config.settle_delay_us)?;
        controller.set_port_mode(PortMode::Drp)?;
        let image = controller.image();
        let generation = controller.generation();

        let role_sw = services
            .get_role_switch()
            .map_err(ControllerError::ArbiterUnavailable)?;
        let port = services
            .register_port(&CAPABILITY)
            .map_err(ControllerError::PortRegistration)?;

        let mut dev = Self {
            irq: None,
            port,
            role_sw,
            state: SpinLock::new(controller),
            dispatcher: InterruptDispatcher::new(),
            latest: SpinLock::new(Publication {
                generation: 0,
                observation: RoleObservation {
                    usb_role: UsbRole::None,
                    data_role: None,
                },
            }),
            notifier: InterruptDispatcher::new(),
        };
        dev.publish(generation, image.attachment().observation());

        if let Some(line) = config.irq {
            let request = IrqRequest {
                line,
                flags: IrqFlags::TRIGGER_FALLING.union(IrqFlags::ONESHOT),
                name: DRIVER_INFO.name,
            };
            let irq = services
                .request_threaded_irq(&request)
                .map_err(ControllerError::IrqRequest)?;
            dev.irq = Some(irq);
        }

        drp_core::kinfo!("pi5usb30213a: probed revision={:#x}", image.revision());
        Ok(dev)
    }

    /// Moves the port toward `role` and routes the data lines for it.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::ModeWrite`] (or
    /// [`ControllerError::Transport`] for a failed refresh) without
    /// notifying anyone if the device was not updated, and
    /// [`ControllerError::RoleSwitch`] if the role switch rejected the role.
    /// A newer register change that overtakes this one before it is
    /// delivered replaces it, and its outcome is not reported here.
    pub fn request_data_role(&self, role: DataRole) -> Result<RegisterImage, ControllerError> {
        let (image, generation) = {
            let mut state = self.state.lock();
            let image = state.request_data_role(role)?;
            (image, state.generation())
        };
        drp_core::kdebug!(
            "pi5usb30213a: data role {:?} requested, control={:#04x}",
            role,
            image.control
        );

        let observation = RoleObservation {
            usb_role: role.into(),
            data_role: Some(role),
        };
        if let Some(Err(e)) = self.publish(generation, observation) {
            return Err(ControllerError::RoleSwitch(e));
        }
        Ok(image)
    }

    /// Re-reads the device and publishes the roles it implies.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the register file could not be read.
    /// Nothing is published in that case.
    pub fn reconcile_from_hardware(&self) -> Result<RoleObservation, TransportError> {
        let (observation, generation) = {
            let mut state = self.state.lock();
            let observation = state.reconcile_from_hardware()?;
            (observation, state.generation())
        };
        self.publish(generation, observation);
        Ok(observation)
    }

    /// Returns a snapshot of the cached register file.
    #[must_use]
    pub fn image(&self) -> RegisterImage {
        self.state.lock().image()
    }

    /// Returns `true` if INT_N is bound to this device.
    #[must_use]
    pub fn irq_bound(&self) -> bool {
        self.irq.is_some()
    }

    /// Returns the interrupt dispatcher's state.
    #[must_use]
    pub fn dispatch_state(&self) -> DispatchState {
        self.dispatcher.state()
    }

    /// Unbinds the device, releasing its resources.
    pub fn remove(self) {
        drp_core::kinfo!("pi5usb30213a: removed");
    }

    /// Records the roles of register change `generation` and delivers the
    /// newest recorded roles.
    ///
    /// Returns the role switch's answer if this call delivered `generation`
    /// itself, and `None` if the roles were superseded or are delivered by
    /// the pass already running on another thread.
    fn publish(
        &self,
        generation: u64,
        observation: RoleObservation,
    ) -> Option<Result<(), DriverError>> {
        {
            let mut latest = self.latest.lock();
            if generation <= latest.generation {
                drp_core::kdebug!(
                    "pi5usb30213a: usb role {} superseded by a newer change",
                    observation.usb_role
                );
                return None;
            }
            *latest = Publication {
                generation,
                observation,
            };
        }

        let mut outcome = None;
        self.notifier.dispatch(|| {
            let newest = *self.latest.lock();
            let routed = self.deliver(newest.observation);
            if newest.generation == generation {
                outcome = Some(routed);
            }
        });
        outcome
    }

    fn deliver(&self, observation: RoleObservation) -> Result<(), DriverError> {
        drp_core::kinfo!("pi5usb30213a: usb role {}", observation.usb_role);
        let routed = self.role_sw.set_role(observation.usb_role);
        if let Err(e) = routed {
            drp_core::kwarn!(
                "pi5usb30213a: role switch rejected {}: {}",
                observation.usb_role,
                e
            );
        }
        if let Some(role) = observation.data_role {
            self.port.set_data_role(role);
        }
        routed
    }
}

impl<T, D, S: PlatformServices> Driver for Pi5usb30213a<T, D, S> {
    fn info(&self) -> DriverInfo {
        DRIVER_INFO
    }
}

impl<T, D, S> DataRoleOps for Pi5usb30213a<T, D, S>
where
    T: RegisterTransport + Send,
    D: DelayNs + Send,
    S: PlatformServices,
    S::Irq: Send + Sync,
{
    fn dr_set(&self, role: DataRole) -> Result<(), DriverError> {
        self.request_data_role(role).map(|_| ()).map_err(|e| {
            drp_core::kerr!("pi5usb30213a: failed to set data role {:?}: {}", role, e);
            e.into()
        })
    }
}

impl<T, D, S> ThreadedIrqHandler for Pi5usb30213a<T, D, S>
where
    T: RegisterTransport + Send,
    D: DelayNs + Send,
    S: PlatformServices,
    S::Irq: Send + Sync,
{
    fn handle_irq(&self) {
        self.dispatcher.dispatch(|| {
            if let Err(e) = self.reconcile_from_hardware() {
                drp_core::kerr!("pi5usb30213a: interrupt left state unchanged: {}", e);
            }
        });
    }
}
