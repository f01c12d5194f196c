//! Status register decoding.
//!
//! [`decode`] is total: every status byte maps to some [`Attachment`].
//! Encodings the device never produces fall back to the standby variant of
//! the affected field rather than failing.

use drp_driver_api::{DataRole, UsbRole};

use super::regs::{
    STATUS_ATTACHED_MASK, STATUS_CHARGING_CURRENT_MASK, STATUS_POLARITY_MASK, STATUS_VBUS,
};

/// What the device sees on the far end of the cable.
///
/// The names follow the device's own terminology: `DeviceAttached` means a
/// USB *device* is attached, so the local port is the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentStatus {
    /// Nothing attached.
    Standby,
    /// A partner acting as device is attached.
    DeviceAttached,
    /// A partner acting as host is attached.
    HostAttached,
    /// An audio adapter accessory is attached.
    AudioAccessory,
    /// A debug accessory is attached.
    DebugAccessory,
}

/// Which CC pin the attachment was detected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlugPolarity {
    /// Nothing attached.
    Standby,
    /// Connected through CC1.
    Cc1,
    /// Connected through CC2 (flipped plug).
    Cc2,
    /// Orientation not determined, e.g. for accessories.
    Undetermined,
}

/// Charging current advertised by the partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargingCurrentStatus {
    /// Nothing attached.
    Standby,
    /// USB default current.
    Default,
    /// 1.5 A.
    Medium,
    /// 3.0 A.
    High,
}

/// Decoded status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    /// Attachment classification.
    pub status: AttachmentStatus,
    /// Plug orientation.
    pub polarity: PlugPolarity,
    /// VBUS present on the connector.
    pub vbus_present: bool,
    /// Partner's advertised current.
    pub current: ChargingCurrentStatus,
}

/// Roles implied by an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleObservation {
    /// Role the local USB controller should take.
    pub usb_role: UsbRole,
    /// Data role to report to the port framework, if any.
    pub data_role: Option<DataRole>,
}

impl Attachment {
    /// Derives the local roles from the attachment.
    ///
    /// An attached device makes us the host and an attached host makes us
    /// the device. Accessories and standby leave the data lines unrouted.
    #[must_use]
    pub const fn observation(&self) -> RoleObservation {
        match self.status {
            AttachmentStatus::DeviceAttached => RoleObservation {
                usb_role: UsbRole::Host,
                data_role: Some(DataRole::Host),
            },
            AttachmentStatus::HostAttached => RoleObservation {
                usb_role: UsbRole::Device,
                data_role: Some(DataRole::Device),
            },
            AttachmentStatus::Standby
            | AttachmentStatus::AudioAccessory
            | AttachmentStatus::DebugAccessory => RoleObservation {
                usb_role: UsbRole::None,
                data_role: None,
            },
        }
    }
}

/// Decodes a status register byte.
#[must_use]
pub const fn decode(status: u8) -> Attachment {
    let attached = match status & STATUS_ATTACHED_MASK {
        0x04 => AttachmentStatus::DeviceAttached,
        0x08 => AttachmentStatus::HostAttached,
        0x0C => AttachmentStatus::AudioAccessory,
        0x10 => AttachmentStatus::DebugAccessory,
        _ => AttachmentStatus::Standby,
    };
    let polarity = match status & STATUS_POLARITY_MASK {
        0x01 => PlugPolarity::Cc1,
        0x02 => PlugPolarity::Cc2,
        0x03 => PlugPolarity::Undetermined,
        _ => PlugPolarity::Standby,
    };
    let current = match status & STATUS_CHARGING_CURRENT_MASK {
        0x20 => ChargingCurrentStatus::Default,
        0x40 => ChargingCurrentStatus::Medium,
        0x60 => ChargingCurrentStatus::High,
        _ => ChargingCurrentStatus::Standby,
    };
    Attachment {
        status: attached,
        polarity,
        vbus_present: status & STATUS_VBUS != 0,
        current,
    }
}
