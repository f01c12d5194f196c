//! Driver identity.

/// Static metadata a driver reports about itself.
#[derive(Debug, Clone, Copy)]
pub struct DriverInfo {
    /// Short driver name, also used to label its interrupt.
    pub name: &'static str,
    /// Devicetree-style compatible string the driver binds to.
    pub compatible: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

/// Implemented by every driver so the platform can identify it.
pub trait Driver {
    /// Returns the driver's static metadata.
    fn info(&self) -> DriverInfo;
}
