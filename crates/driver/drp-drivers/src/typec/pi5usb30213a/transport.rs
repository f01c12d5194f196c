//! Whole-register-file transport.

use drp_driver_api::{BlockBus, I2cBlockDevice, TransportError};

use super::regs::{REG_FILE_LEN, RegisterImage};

/// Atomic access to the device's register file.
///
/// Every call moves all four registers in one bus transfer. Implementations
/// must report a transfer that moved the wrong number of bytes as
/// [`TransportError::ShortTransfer`], never as a successful partial access.
pub trait RegisterTransport {
    /// Reads the whole register file.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the bus failed or the frame was short.
    fn read_all(&mut self) -> Result<RegisterImage, TransportError>;

    /// Writes the whole register file.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the bus failed or the frame was short.
    fn write_all(&mut self, image: &RegisterImage) -> Result<(), TransportError>;
}

/// [`RegisterTransport`] over a framed [`BlockBus`].
pub struct BlockTransport<B> {
    bus: B,
}

/// Transport for a device on an `embedded-hal` I²C bus.
pub type I2cTransport<I> = BlockTransport<I2cBlockDevice<I>>;

impl<B: BlockBus> BlockTransport<B> {
    /// Wraps a block bus.
    #[must_use]
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }
}

impl<I: embedded_hal::i2c::I2c> I2cTransport<I> {
    /// Creates a transport for the device at `address` on `i2c`.
    #[must_use]
    pub const fn i2c(i2c: I, address: u8) -> Self {
        Self::new(I2cBlockDevice::new(i2c, address))
    }
}

const fn check_len(actual: usize) -> Result<(), TransportError> {
    if actual == REG_FILE_LEN {
        Ok(())
    } else {
        Err(TransportError::ShortTransfer {
            expected: REG_FILE_LEN,
            actual,
        })
    }
}

impl<B: BlockBus> RegisterTransport for BlockTransport<B> {
    fn read_all(&mut self) -> Result<RegisterImage, TransportError> {
        let mut frame = [0u8; REG_FILE_LEN];
        let result = self
            .bus
            .recv(&mut frame)
            .map_err(TransportError::from)
            .and_then(check_len);
        if let Err(e) = result {
            drp_core::kerr!("pi5usb30213a: register read failed: {}", e);
            return Err(e);
        }
        drp_core::kdebug!(
            "pi5usb30213a: read regs={:02x} {:02x} {:02x} {:02x}",
            frame[0],
            frame[1],
            frame[2],
            frame[3]
        );
        Ok(RegisterImage::from_bytes(frame))
    }

    fn write_all(&mut self, image: &RegisterImage) -> Result<(), TransportError> {
        let frame = image.to_bytes();
        drp_core::kdebug!(
            "pi5usb30213a: write regs={:02x} {:02x} {:02x} {:02x}",
            frame[0],
            frame[1],
            frame[2],
            frame[3]
        );
        let result = self
            .bus
            .send(&frame)
            .map_err(TransportError::from)
            .and_then(check_len);
        if let Err(e) = result {
            drp_core::kerr!("pi5usb30213a: register write failed: {}", e);
        }
        result
    }
}
