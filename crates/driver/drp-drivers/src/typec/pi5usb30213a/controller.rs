//! Register cache and port mode control.
//!
//! [`RoleSwitchController`] owns the transport, the settle delay and the
//! cached [`RegisterImage`]. The device keeps it behind a single lock, so
//! each method below runs as one uninterrupted read/compute/write/settle
//! span with respect to every other path that touches the hardware.

use embedded_hal::delay::DelayNs;

use drp_driver_api::{DataRole, TransportError};

use super::decode::{AttachmentStatus, RoleObservation};
use super::error::ControllerError;
use super::regs::{Interrupt, PortMode, RegisterImage};
use super::transport::RegisterTransport;

/// Interrupt causes that indicate a protection event.
const FAULTS: Interrupt = Interrupt::FAULT
    .union(Interrupt::OTP)
    .union(Interrupt::OVP)
    .union(Interrupt::OCP);

/// Cached register file plus the means to read, write and settle it.
pub struct RoleSwitchController<T, D> {
    transport: T,
    delay: D,
    image: RegisterImage,
    /// Set when a write failed and the cache may not match the device.
    stale: bool,
    settle_delay_us: u32,
    /// Bumped by every successful write and reconcile read.
    generation: u64,
}

impl<T: RegisterTransport, D: DelayNs> RoleSwitchController<T, D> {
    /// Reads the register file once and builds the cache from it.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the initial read fails.
    pub fn attach(
        mut transport: T,
        delay: D,
        settle_delay_us: u32,
    ) -> Result<Self, TransportError> {
        let image = transport.read_all()?;
        Ok(Self {
            transport,
            delay,
            image,
            stale: false,
            settle_delay_us,
            generation: 0,
        })
    }

    /// Returns a snapshot of the cached register file.
    #[must_use]
    pub const fn image(&self) -> RegisterImage {
        self.image
    }

    /// Returns `true` if the cache must be re-read before the next write.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Returns the number of state changes applied so far.
    ///
    /// Read under the same lock as the change it follows, this orders the
    /// results of concurrent callers.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Selects `mode` and writes the whole register file.
    ///
    /// A stale cache is refreshed from the device first, so the new image
    /// never carries bits from a write that did not land.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Transport`] if the refresh read fails, or
    /// [`ControllerError::ModeWrite`] if the write fails. After a failed
    /// write the cache holds its previous value and is marked stale.
    pub fn set_port_mode(&mut self, mode: PortMode) -> Result<RegisterImage, ControllerError> {
        if self.stale {
            self.resync()?;
        }
        self.write_port_mode(mode).map_err(ControllerError::ModeWrite)
    }

    /// Points the dual-role port toward `role`.
    ///
    /// The port stays dual-role; a host request prefers the source side
    /// and a device request prefers the sink side.
    ///
    /// # Errors
    ///
    /// See [`set_port_mode`](Self::set_port_mode).
    pub fn request_data_role(&mut self, role: DataRole) -> Result<RegisterImage, ControllerError> {
        let mode = match role {
            DataRole::Host => PortMode::DrpTrySource,
            DataRole::Device => PortMode::DrpTrySink,
        };
        self.set_port_mode(mode)
    }

    /// Re-reads the register file and derives the roles it implies.
    ///
    /// With nothing attached the port is put back into plain DRP so any
    /// sink/source preference from an earlier request does not outlive the
    /// cable. A failed reset write is logged and does not hide the
    /// observation.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the read fails. The cache is left as
    /// it was.
    pub fn reconcile_from_hardware(&mut self) -> Result<RoleObservation, TransportError> {
        let image = self.transport.read_all()?;
        self.image = image;
        self.stale = false;
        self.generation += 1;

        let interrupts = image.interrupts();
        if interrupts.intersects(FAULTS) {
            drp_core::kwarn!("pi5usb30213a: protection event {:?}", interrupts);
        } else if !interrupts.is_empty() {
            drp_core::kdebug!("pi5usb30213a: interrupt {:?}", interrupts);
        }

        let attachment = image.attachment();
        if attachment.status == AttachmentStatus::Standby {
            if let Err(e) = self.write_port_mode(PortMode::Drp) {
                drp_core::kerr!("pi5usb30213a: failed to restore DRP mode: {}", e);
            }
        }
        Ok(attachment.observation())
    }

    fn resync(&mut self) -> Result<(), TransportError> {
        self.image = self.transport.read_all()?;
        self.stale = false;
        Ok(())
    }

    fn write_port_mode(&mut self, mode: PortMode) -> Result<RegisterImage, TransportError> {
        let previous = self.image;
        self.image = previous.with_port_mode(mode);
        if let Err(e) = self.transport.write_all(&self.image) {
            self.image = previous;
            self.stale = true;
            return Err(e);
        }
        self.delay.delay_us(self.settle_delay_us);
        self.generation += 1;
        Ok(self.image)
    }
}
