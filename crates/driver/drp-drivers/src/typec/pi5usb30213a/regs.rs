//! PI5USB30213A register file layout.
//!
//! The device has no register-pointer phase: every transfer moves the whole
//! four-byte file `[id, control, interrupt, status]`. Only the control byte
//! is writable; the other bytes are written back unchanged as part of each
//! frame.

use bitflags::bitflags;

use super::decode::{self, Attachment};

/// Size of one register-file transfer in bytes.
pub const REG_FILE_LEN: usize = 4;

// ---------------------------------------------------------------------------
// Control register (byte 1)
// ---------------------------------------------------------------------------

/// Bits of the control register that select the port mode.
pub const PORT_SETTING_MASK: u8 = 0x46;

/// Bits of the control register that select the advertised charging current.
pub const CHARGING_CURRENT_REQUEST_MASK: u8 = 0x18;

bitflags! {
    /// Single-bit control register settings.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Control: u8 {
        /// Masks the INT_N output while set.
        const INTERRUPT_MASK      = 1 << 0;
        /// Enables audio/debug accessory detection.
        const ACCESSORY_DETECTION = 1 << 5;
        /// Enables the low-power unattached state.
        const POWER_SAVING        = 1 << 7;
    }
}

/// Port mode selected by the control register's port-setting field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PortMode {
    /// Upstream-facing port only.
    Device = 0x00,
    /// Downstream-facing port only.
    Host = 0x02,
    /// Dual-role port with no preference.
    Drp = 0x04,
    /// Dual-role port that tries to settle as a sink.
    DrpTrySink = 0x46,
    /// Dual-role port that tries to settle as a source.
    DrpTrySource = 0x06,
}

impl PortMode {
    /// Field value of this mode within [`PORT_SETTING_MASK`].
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Extracts the mode from a control byte.
    ///
    /// Returns `None` for field encodings the device does not define.
    #[must_use]
    pub const fn from_control(control: u8) -> Option<Self> {
        match control & PORT_SETTING_MASK {
            0x00 => Some(Self::Device),
            0x02 => Some(Self::Host),
            0x04 => Some(Self::Drp),
            0x46 => Some(Self::DrpTrySink),
            0x06 => Some(Self::DrpTrySource),
            _ => None,
        }
    }
}

/// Charging current the port advertises when acting as a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChargingCurrentRequest {
    /// USB default current.
    Default = 0x00,
    /// 1.5 A.
    Medium = 0x08,
    /// 3.0 A.
    High = 0x10,
}

impl ChargingCurrentRequest {
    /// Extracts the request from a control byte. The reserved encoding reads
    /// as [`Default`](Self::Default).
    #[must_use]
    pub const fn from_control(control: u8) -> Self {
        match control & CHARGING_CURRENT_REQUEST_MASK {
            0x08 => Self::Medium,
            0x10 => Self::High,
            _ => Self::Default,
        }
    }
}

// ---------------------------------------------------------------------------
// Interrupt register (byte 2)
// ---------------------------------------------------------------------------

bitflags! {
    /// Pending interrupt causes. The device clears them on read.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Interrupt: u8 {
        /// A partner attached.
        const ATTACHED        = 1 << 0;
        /// The partner detached.
        const DETACHED        = 1 << 1;
        /// A fault was detected.
        const FAULT           = 1 << 2;
        /// Over-temperature protection tripped.
        const OTP             = 1 << 3;
        /// Over-voltage protection tripped.
        const OVP             = 1 << 5;
        /// Over-current protection tripped.
        const OCP             = 1 << 6;
        /// The device recovered from a fault.
        const FAULT_RECOVERED = 1 << 7;
    }
}

// ---------------------------------------------------------------------------
// Status register (byte 3)
// ---------------------------------------------------------------------------

/// VBUS detected on the connector.
pub const STATUS_VBUS: u8 = 1 << 7;
/// Charging current the partner advertises.
pub const STATUS_CHARGING_CURRENT_MASK: u8 = 0x60;
/// Attachment classification.
pub const STATUS_ATTACHED_MASK: u8 = 0x1C;
/// Plug orientation.
pub const STATUS_POLARITY_MASK: u8 = 0x03;

// ---------------------------------------------------------------------------
// RegisterImage
// ---------------------------------------------------------------------------

/// An in-memory copy of the whole register file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterImage {
    /// Device ID; the upper five bits hold the silicon revision.
    pub id: u8,
    /// Control register.
    pub control: u8,
    /// Interrupt register.
    pub interrupt: u8,
    /// Status register.
    pub status: u8,
}

impl RegisterImage {
    /// Builds an image from a wire frame.
    #[must_use]
    pub const fn from_bytes(frame: [u8; REG_FILE_LEN]) -> Self {
        Self {
            id: frame[0],
            control: frame[1],
            interrupt: frame[2],
            status: frame[3],
        }
    }

    /// Encodes the image as a wire frame.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; REG_FILE_LEN] {
        [self.id, self.control, self.interrupt, self.status]
    }

    /// Silicon revision.
    #[must_use]
    pub const fn revision(&self) -> u8 {
        self.id >> 3
    }

    /// Port mode currently selected, if the field holds a defined encoding.
    #[must_use]
    pub const fn port_mode(&self) -> Option<PortMode> {
        PortMode::from_control(self.control)
    }

    /// Returns a copy with the port-setting field replaced by `mode`.
    ///
    /// Every control bit outside [`PORT_SETTING_MASK`] and every other
    /// register byte is carried over unchanged.
    #[must_use]
    pub const fn with_port_mode(self, mode: PortMode) -> Self {
        Self {
            control: (self.control & !PORT_SETTING_MASK) | mode.bits(),
            ..self
        }
    }

    /// Single-bit control settings.
    #[must_use]
    pub const fn control_flags(&self) -> Control {
        Control::from_bits_truncate(self.control)
    }

    /// Advertised charging current.
    #[must_use]
    pub const fn charging_current_request(&self) -> ChargingCurrentRequest {
        ChargingCurrentRequest::from_control(self.control)
    }

    /// Pending interrupt causes captured in this image.
    #[must_use]
    pub const fn interrupts(&self) -> Interrupt {
        Interrupt::from_bits_truncate(self.interrupt)
    }

    /// Decoded attachment status.
    #[must_use]
    pub const fn attachment(&self) -> Attachment {
        decode::decode(self.status)
    }
}
