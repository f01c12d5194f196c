//! Interrupt resource types.

use bitflags::bitflags;

/// A platform interrupt line, as handed to a driver by its bus client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrqLine {
    number: u32,
}

impl IrqLine {
    /// Creates a new IRQ line descriptor.
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self { number }
    }

    /// Returns the platform interrupt number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }
}

bitflags! {
    /// Interrupt request flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqFlags: u8 {
        /// Raise the interrupt on a high-to-low transition.
        const TRIGGER_FALLING = 1 << 0;
        /// Keep the line masked until the threaded handler returns.
        const ONESHOT         = 1 << 1;
    }
}

/// A threaded interrupt request.
///
/// The platform runs the handler on a dedicated thread, never in
/// interrupt-disabled context, so handlers may perform bus I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrqRequest {
    /// Line to bind.
    pub line: IrqLine,
    /// Trigger condition and request flags.
    pub flags: IrqFlags,
    /// Handler name (for diagnostics).
    pub name: &'static str,
}

/// A device whose interrupt is serviced on a platform thread.
///
/// The platform calls [`handle_irq`](Self::handle_irq) once per delivered
/// edge and re-arms one-shot lines after it returns.
pub trait ThreadedIrqHandler: Send + Sync {
    /// Services one interrupt. Must not block indefinitely and must not fail.
    fn handle_irq(&self);
}
