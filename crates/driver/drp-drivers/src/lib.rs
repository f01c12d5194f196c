//! USB Type-C port controller drivers.

#![cfg_attr(not(test), no_std)]

// ── Subsystem modules ───────────────────────────────────────────────────

pub mod typec;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use self::typec::pi5usb30213a;
