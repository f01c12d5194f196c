//! Framed block-bus access.
//!
//! Some devices expose their whole register file as one unaddressed block:
//! every access is a complete read or a complete write of a fixed-size
//! frame, with no register-pointer phase. [`BlockBus`] models exactly that
//! primitive, reporting how many bytes actually moved so callers can tell a
//! short transfer from a bus failure.

use core::fmt;

use embedded_hal::i2c::{Error as _, I2c, SevenBitAddress};

pub use embedded_hal::i2c::ErrorKind;

/// A bus that moves unaddressed byte frames to and from one device.
pub trait BlockBus {
    /// Sends `buf` to the device in a single transfer.
    ///
    /// Returns the number of bytes the device accepted.
    ///
    /// # Errors
    ///
    /// Returns the bus error kind if the transfer failed outright.
    fn send(&mut self, buf: &[u8]) -> Result<usize, ErrorKind>;

    /// Receives a single transfer from the device into `buf`.
    ///
    /// Returns the number of bytes the device produced.
    ///
    /// # Errors
    ///
    /// Returns the bus error kind if the transfer failed outright.
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, ErrorKind>;
}

/// Errors from a fixed-size block transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The bus reported an I/O failure.
    Bus(ErrorKind),
    /// The transfer completed with the wrong number of bytes.
    ShortTransfer {
        /// Frame size the protocol requires.
        expected: usize,
        /// Bytes actually moved.
        actual: usize,
    },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(kind) => write!(f, "bus error: {kind}"),
            Self::ShortTransfer { expected, actual } => {
                write!(f, "short transfer: {actual}/{expected} bytes")
            }
        }
    }
}

impl From<ErrorKind> for TransportError {
    fn from(kind: ErrorKind) -> Self {
        Self::Bus(kind)
    }
}

/// An I²C target at a fixed 7-bit address, used as a [`BlockBus`].
///
/// Plain `write`/`read` transactions are issued with no register-address
/// byte, so each transaction is one whole frame.
pub struct I2cBlockDevice<I> {
    i2c: I,
    address: SevenBitAddress,
}

impl<I: I2c> I2cBlockDevice<I> {
    /// Wraps an I²C bus handle for the target at `address`.
    #[must_use]
    pub const fn new(i2c: I, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    /// Returns the target address.
    #[must_use]
    pub const fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Releases the underlying bus handle.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> BlockBus for I2cBlockDevice<I> {
    fn send(&mut self, buf: &[u8]) -> Result<usize, ErrorKind> {
        self.i2c.write(self.address, buf).map_err(|e| e.kind())?;
        Ok(buf.len())
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, ErrorKind> {
        self.i2c.read(self.address, buf).map_err(|e| e.kind())?;
        Ok(buf.len())
    }
}
